use dotenvy::dotenv;
use std::env;

pub struct Config {
    pub mode: String, // "demo" (fixture-backed) or "live" (fed by the read layer)
    pub positions_file: String,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();

        let mode = env::var("MODE").unwrap_or_else(|_| "demo".to_string());
        match mode.as_str() {
            "demo" | "live" => {}
            _ => panic!("Invalid MODE value (must be 'demo' or 'live')"),
        }

        let positions_file =
            env::var("POSITIONS_FILE").unwrap_or_else(|_| "data/demo_positions.json".to_string());

        Config {
            mode,
            positions_file,
        }
    }
}
