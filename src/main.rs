use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use speech_trigger::config_loader::SETTINGS;
use speech_trigger::control::{HostAdapter, SpeechTrigger};
use speech_trigger::engine::RodioSink;
use speech_trigger::synth::azure::{AzureSynthesizer, Credentials};
use speech_trigger::TriggerProperties;

/// Reference host: binds command-line values as control properties,
/// triggers one utterance, and reports the control outputs as JSON.
#[derive(Parser)]
#[command(
    name = "speech-trigger",
    version,
    about = "Speak a line of text through the Azure Speech REST endpoint"
)]
struct Args {
    /// Text to speak
    text: String,

    /// Azure subscription key (falls back to configuration)
    #[arg(long)]
    key: Option<String>,

    /// Azure region, e.g. eastus or westeurope
    #[arg(long)]
    region: Option<String>,

    /// Language tag for the SSML document, e.g. en-US
    #[arg(long)]
    language: Option<String>,

    /// Voice name, e.g. en-US-ChristopherNeural
    #[arg(long)]
    voice: Option<String>,

    /// Deliver the text with auto-speak set instead of triggering explicitly
    #[arg(long)]
    auto: bool,
}

struct ConsoleHost;

impl HostAdapter for ConsoleHost {
    fn notify_output_changed(&self) {
        info!("control output changed");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let (props, timeout) = {
        let settings = SETTINGS.read().unwrap();
        (
            TriggerProperties {
                text: args.text,
                subscription_key: args
                    .key
                    .unwrap_or_else(|| settings.subscription_key.clone()),
                region: args.region.unwrap_or_else(|| settings.region.clone()),
                language: args.language.unwrap_or_else(|| settings.language.clone()),
                voice: args.voice.unwrap_or_else(|| settings.voice.clone()),
                auto_speak: args.auto || settings.auto_speak,
                ..Default::default()
            },
            Duration::from_secs(settings.synthesis_timeout_secs),
        )
    };

    let synth = Arc::new(AzureSynthesizer::new(Credentials {
        subscription_key: props.subscription_key.clone(),
        region: props.region.clone(),
    }));
    let mut control = SpeechTrigger::with_timeout(
        synth,
        Arc::new(RodioSink::new()),
        Arc::new(ConsoleHost),
        timeout,
    );

    // Deliver the bound values through the normal update cycle; with --auto
    // that already fires the trigger, otherwise trigger explicitly.
    let task = match control.update(props) {
        Some(task) => Some(task),
        None => control.speak(),
    };

    let Some(task) = task else {
        eprintln!("Nothing to speak: text is empty");
        return ExitCode::FAILURE;
    };

    let result = task.wait().await;
    let outputs = control.get_outputs();
    println!(
        "{}",
        serde_json::to_string(&outputs).expect("outputs serialize to JSON")
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("speak failed: {e}");
            ExitCode::FAILURE
        }
    }
}
