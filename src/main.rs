//! Weather Hazard Briefing - daily run
//!
//! One pass, start to finish:
//! 1. Fetches forecast discussions, active alerts and flooding gauges for
//!    every configured region, plus the NHC tropical outlook
//! 2. Writes the raw document and the per-region summarizer prompts
//! 3. Optionally summarizes each region with an LLM
//! 4. Renders the HTML briefing
//!
//! Usage:
//!   cargo run --release                          # live run, concurrent fetches
//!   cargo run --release -- --summarize           # with LLM summaries
//!   cargo run --release -- --replay replay.json  # offline, canned responses
//!
//! Environment:
//!   WXBRIEF_USER_AGENT - overrides the configured User-Agent
//!   OPENAI_API_KEY     - required for --summarize
//!   OPENAI_MODEL       - summarizer model (default gpt-4o)
//!   RUST_LOG           - log filter (default info, debug with --verbose)

use clap::Parser;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::process;

use wxbrief_service::client::{EndpointClient, HttpClient};
use wxbrief_service::config::{DEFAULT_CONFIG_PATH, FetchStrategy, ServiceConfig, load_config};
use wxbrief_service::logging::init_logging;
use wxbrief_service::model::{FetchStatus, WeatherDocument};
use wxbrief_service::output::{self, DEFAULT_OUTPUT_DIR};
use wxbrief_service::pipeline::PipelineDriver;
use wxbrief_service::replay::ReplayClient;
use wxbrief_service::report::{build_prompts, render_report};
use wxbrief_service::summarize::{OpenAiSummarizer, error_paragraph, summarize_all};

#[derive(Debug, Parser)]
#[command(name = "wxbrief", version, about = "Daily weather hazard briefing")]
struct Args {
    /// Region registry
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for weather_data.json, prompts_for_llm.json and index.html
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Await every request before issuing the next
    #[arg(long)]
    sequential: bool,

    /// Summarize each region with the LLM (needs OPENAI_API_KEY)
    #[arg(long)]
    summarize: bool,

    /// Skip the NHC tropical outlook
    #[arg(long)]
    no_tropical: bool,

    /// Answer requests from a replay file instead of the network
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

async fn fetch<C: EndpointClient>(client: &C, config: &ServiceConfig, args: &Args) -> WeatherDocument {
    let mut driver = PipelineDriver::from_config(client, config);
    if args.sequential {
        driver = driver.with_strategy(FetchStrategy::Sequential);
    }
    if args.no_tropical {
        driver = driver.without_tropical_outlook();
    }
    driver.run(&config.regions).await
}

fn print_document(doc: &WeatherDocument) {
    for (name, report) in &doc.regions {
        let ok = report
            .discussions
            .iter()
            .filter(|d| d.fetch_status == FetchStatus::Ok)
            .count();
        let mark = if ok == report.discussions.len() { "✓" } else { "⚠" };
        println!(
            "   {} {} - {}/{} discussions, {} alerts, {} gauges above flood stage",
            mark,
            name,
            ok,
            report.discussions.len(),
            report.alerts.len(),
            report.gauges.len()
        );
    }
    if let Some(tropical) = &doc.tropical {
        match &tropical.error {
            Some(err) => println!("   ⚠ Tropical outlook unavailable: {}", err),
            None => println!(
                "   ✓ Tropical outlook - {}% 7-day formation chance",
                tropical.formation_chance_7day
            ),
        }
    }
}

fn exit_on_output_error<T>(result: Result<T, output::OutputError>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("\n❌ {}\n", e);
        process::exit(1);
    })
}

async fn summarize_regions(doc_prompts: &IndexMap<String, String>) -> IndexMap<String, String> {
    match OpenAiSummarizer::from_env() {
        Ok(summarizer) => {
            println!("🤖 Summarizing {} regions with {}...", doc_prompts.len(), summarizer.model());
            summarize_all(&summarizer, doc_prompts).await
        }
        Err(e) => {
            eprintln!("   ✗ Summarizer unavailable: {}", e);
            let paragraph = error_paragraph(&e);
            doc_prompts.keys().map(|name| (name.clone(), paragraph.clone())).collect()
        }
    }
}

fn report_written(label: &str, path: &Path) {
    println!("   ✓ {} → {}", label, path.display());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    dotenv::dotenv().ok();
    init_logging(args.verbose);

    println!("🌦  Weather Hazard Briefing");
    println!("==========================\n");

    println!("📋 Loading region registry from {}...", args.config.display());
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            process::exit(1);
        }
    };
    println!(
        "✓ {} regions, {} forecast offices\n",
        config.regions.len(),
        config.office_count()
    );

    let doc = match &args.replay {
        Some(path) => {
            println!("📼 Replaying responses from {}...", path.display());
            let client = ReplayClient::load(path).unwrap_or_else(|e| {
                eprintln!("\n❌ {}\n", e);
                process::exit(1);
            });
            let doc = fetch(&client, &config, &args).await;
            println!("   {} canned requests served", client.request_count());
            doc
        }
        None => {
            println!("📥 Fetching weather data...");
            let client = HttpClient::new(&config.service.user_agent).unwrap_or_else(|e| {
                eprintln!("\n❌ {}\n", e);
                process::exit(1);
            });
            fetch(&client, &config, &args).await
        }
    };
    print_document(&doc);
    println!();

    println!("💾 Writing artifacts to {}...", args.output.display());
    let path = exit_on_output_error(output::write_document(&args.output, &doc));
    report_written("Weather data", &path);

    let prompts = build_prompts(&doc);
    let path = exit_on_output_error(output::write_prompts(&args.output, &prompts));
    report_written("Prompts", &path);
    println!();

    let summaries = if args.summarize {
        let summaries = summarize_regions(&prompts).await;
        println!();
        summaries
    } else {
        IndexMap::new()
    };

    println!("📰 Rendering briefing...");
    let html = render_report(&doc, &summaries);
    let path = exit_on_output_error(output::write_report(&args.output, &html));
    report_written("Report", &path);

    println!("\n✅ Done");
}
