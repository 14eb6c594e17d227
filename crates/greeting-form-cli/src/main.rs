//! greeting-form — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use greeting_form::{resolve_base_url, FormConfig, FormDispatcher, FormPage};

mod repl;

#[derive(Parser)]
#[command(
    name = "greeting-form",
    about = "Submit a name to a greeting endpoint and show the reply",
    version
)]
struct Cli {
    /// Server base URL. Also reads from GREETING_FORM_URL.
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// HTML page to bind to (defaults to the built-in page).
    #[arg(short, long, global = true)]
    page: Option<String>,

    /// Request timeout in milliseconds (none by default).
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the name field, submit the form, and print the greeting.
    Submit {
        /// Value typed into the name field.
        #[arg(short, long, default_value = "")]
        name: String,
    },

    /// Print the page's addressable elements.
    Show,

    /// Launch interactive mode: every line typed is submitted.
    Repl,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

/// Submit `name` and return the resulting greeting.
///
/// `None` means the submission failed. The dispatcher has already logged
/// it, so it is not turned into an error a second time.
async fn submit_once(dispatcher: &FormDispatcher, name: String) -> anyhow::Result<Option<String>> {
    if dispatcher.submit_with(name).await?.wait().await.is_err() {
        return Ok(None);
    }
    Ok(Some(dispatcher.display_text().await.unwrap_or_default()))
}

fn load_page(path: Option<&str>) -> anyhow::Result<FormPage> {
    let page = match path {
        Some(path) => FormPage::load(path)?,
        None => FormPage::default_page(),
    };
    Ok(page)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = FormConfig::with_base_url(resolve_base_url(cli.server.as_deref()));
    config.timeout_ms = cli.timeout_ms;

    match cli.command {
        Commands::Submit { name } => {
            let page = load_page(cli.page.as_deref())?;
            tracing::info!("Submitting to {}{}", config.base_url, config.endpoint);
            let dispatcher = FormDispatcher::from_config(config, page).await?;
            match submit_once(&dispatcher, name).await? {
                Some(text) => println!("{text}"),
                None => std::process::exit(1),
            }
        }

        Commands::Show => {
            let page = load_page(cli.page.as_deref())?;
            for el in page.elements() {
                match &el.value {
                    Some(value) => println!("#{:<16} <{}> value={value:?}", el.id, el.tag),
                    None => println!("#{:<16} <{}> text={:?}", el.id, el.tag, el.text),
                }
            }
        }

        Commands::Repl => {
            let page = load_page(cli.page.as_deref())?;
            let dispatcher = FormDispatcher::from_config(config, page).await?;
            let handle = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || repl::run(dispatcher, handle)).await??;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "greeting-form", &mut std::io::stdout());
        }
    }

    Ok(())
}
