use actuator_config::ActuatorConfig;
use schemars::schema_for;

pub fn main() {
  let output_path = std::env::args()
    .nth(1)
    .unwrap_or("libs/config/actuator.schema.json".to_string());

  println!("⚙️ Generating JSON schema for Actuator config file...");
  let schema = schema_for!(ActuatorConfig);
  // @expected: the schema is built from our own types, it always serializes
  let as_string = serde_json::to_string_pretty(&schema).unwrap();
  println!("✏️ Writing to: {}", output_path);
  std::fs::write(&output_path, as_string)
    .unwrap_or_else(|e| panic!("Failed to write schema to \"{}\": {}", output_path, e));
  println!("✅ Done");
}
