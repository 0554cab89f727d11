use log::error;
use std::env;
use std::process::ExitCode;

use mealplan_core::{parse_line, AppConfig, RecipeImporter};

const USAGE: &str = "Usage:\n  mealplan parse \"<ingredient line>\"\n  mealplan import <url>";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<String, Box<dyn std::error::Error>> {
    match args {
        [command, rest @ ..] if command == "parse" && !rest.is_empty() => {
            let parsed = parse_line(&rest.join(" "));
            Ok(serde_json::to_string_pretty(&parsed)?)
        }
        [command, url] if command == "import" => {
            let config = AppConfig::load()?;
            let importer = RecipeImporter::from_config(&config)?;
            let recipes = importer.import_from_url(url).await?;
            Ok(serde_json::to_string_pretty(&recipes)?)
        }
        _ => Err(USAGE.into()),
    }
}
