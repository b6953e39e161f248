use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::Relay;
use crate::core::{AppConfig, init_tracing};
use crate::intake::FormIntake;
use crate::openai::OpenAiCompletion;

pub async fn run(config: AppConfig) -> Result<()> {
    init_tracing("info");

    let mut rl = DefaultEditor::new()?;

    let completion = Arc::new(OpenAiCompletion::new(
        &config.llm_api_hostname,
        &config.llm_api_key,
        config.completion_options(),
    ));
    let intake = Arc::new(FormIntake::new(&config.intake_url));
    let mut relay = Relay::builder(
        completion,
        intake,
        &config.system_message,
        &config.fallback_message(),
    )
    .build();

    println!("{}", config.greeting());

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if let Some(reply) = relay.submit(&line).await {
                    let _ = rl.add_history_entry(line.as_str());
                    println!("{}", reply);
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
