use anyhow::Result;
use clap::Parser;
use ghostwriter::assembler::{AssembledDocument, Assembler};
use ghostwriter::config::Config;
use ghostwriter::document;
use ghostwriter::models::{GenerationRequest, Tone};
use ghostwriter::observer::ConsoleObserver;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ghostwriter")]
#[command(about = "Generate an SEO-friendly blog post, with optional AI images")]
struct CliArgs {
    /// Blog title.
    #[arg(long)]
    title: String,

    /// Keywords, separated by commas.
    #[arg(long)]
    keywords: String,

    #[arg(long, value_enum, default_value_t = Tone::Professional)]
    tone: Tone,

    /// Target length in words (250 to 2000, in steps of 250).
    #[arg(long, default_value_t = 500)]
    words: u32,

    /// Number of images to generate (0 to 10).
    #[arg(long, default_value_t = 0)]
    images: u32,

    /// Directory for the .md and .txt downloads.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghostwriter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let output_dir = args.output_dir.clone();
    let request = match request_from_args(args) {
        Ok(request) => request,
        Err(e) => {
            warn!("{}", e);
            std::process::exit(2);
        }
    };

    let assembler = Assembler::from_config(&config)?;
    let observer = ConsoleObserver::stdout();

    info!("Starting ghostwriter");

    let post = match assembler.assemble(&request, &observer).await {
        Ok(post) => post,
        Err(e) => {
            error!("An error occurred: {}", e);
            std::process::exit(1);
        }
    };

    let paths = document::write_exports(&output_dir, request.title(), &post.markdown)?;
    println!();
    println!("{}", summary(&post));
    println!("Markdown: {}", paths.markdown.display());
    println!("Text:     {}", paths.plain_text.display());

    Ok(())
}

fn request_from_args(args: CliArgs) -> ghostwriter::Result<GenerationRequest> {
    GenerationRequest::new(args.title, args.keywords, args.tone, args.words, args.images)
}

fn summary(post: &AssembledDocument) -> String {
    let metrics = post.metrics();
    let mut lines = vec![match &post.generation_error {
        Some(e) => format!("Blog post incomplete, keeping partial text. {}", e),
        None => "Blog post generated successfully!".to_string(),
    }];

    lines.push(format!("Word Count:      {}", group_thousands(metrics.word_count)));
    lines.push(format!("Character Count: {}", group_thousands(metrics.char_count)));
    lines.push(format!("Reading Time:    {} min", metrics.reading_time_minutes));

    let generated = post.image_urls().len();
    if generated > 0 {
        lines.push(format!("Images Generated: {}", generated));
    }

    lines.join("\n")
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostwriter::models::GeneratedImage;

    fn post(markdown: &str, url: Option<&str>, generation_error: Option<&str>) -> AssembledDocument {
        AssembledDocument {
            markdown: markdown.to_string(),
            images: url
                .map(|url| GeneratedImage {
                    index: 0,
                    description: "d".to_string(),
                    url: Some(url.to_string()),
                })
                .into_iter()
                .collect(),
            generation_error: generation_error.map(str::to_string),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_summary_without_images() {
        let text = summary(&post("one two three", None, None));
        assert!(text.starts_with("Blog post generated successfully!"));
        assert!(text.contains("Word Count:      3"));
        assert!(text.contains("Character Count: 13"));
        assert!(text.contains("Reading Time:    1 min"));
        assert!(!text.contains("Images Generated"));
    }

    #[test]
    fn test_summary_with_images_and_partial_text() {
        let text = summary(&post("x", Some("https://u"), Some("Text generation failed: reset")));
        assert!(text.starts_with("Blog post incomplete"));
        assert!(text.contains("reset"));
        assert!(text.contains("Images Generated: 1"));
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["ghostwriter", "--title", "T", "--keywords", "k"]);
        assert_eq!(args.tone, Tone::Professional);
        assert_eq!(args.words, 500);
        assert_eq!(args.images, 0);
        assert_eq!(args.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_request_from_args_rejects_off_step_word_count() {
        let args = CliArgs::parse_from([
            "ghostwriter",
            "--title",
            "T",
            "--keywords",
            "k",
            "--words",
            "300",
        ]);
        let err = request_from_args(args).unwrap_err();
        assert!(matches!(err, ghostwriter::Error::Validation(ref m) if m.contains("300")));
    }

    #[test]
    fn test_request_from_args_trims_title() {
        let args = CliArgs::parse_from(["ghostwriter", "--title", " Tea ", "--keywords", "k"]);
        assert_eq!(request_from_args(args).unwrap().title(), "Tea");
    }

    #[test]
    fn test_cli_tone_values() {
        let args = CliArgs::parse_from([
            "ghostwriter",
            "--title",
            "T",
            "--keywords",
            "k",
            "--tone",
            "inspirational",
            "--images",
            "3",
        ]);
        assert_eq!(args.tone, Tone::Inspirational);
        assert_eq!(args.images, 3);
    }
}
