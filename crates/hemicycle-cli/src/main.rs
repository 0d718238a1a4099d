mod writer;

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use hemicycle_crawler::extract::{Format, XmlDialect};
use hemicycle_crawler::{HarvestConfig, Harvester, OnError, Publish, SourceProfile};
use tokio::runtime;

use crate::writer::{OutputFormat, RecordWriter};

/// Parliamentary records harvester
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[clap(name = "harvest")]
    Harvest(HarvestArgs),
    #[clap(name = "extract")]
    Extract(ExtractArgs),
    #[clap(hide = true)]
    Completion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ArgEnum)]
pub enum Profile {
    AdoptedTexts,
    Minutes,
}

impl From<Profile> for SourceProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::AdoptedTexts => SourceProfile::adopted_texts(),
            Profile::Minutes => SourceProfile::minutes(),
        }
    }
}

/// Follow next-page links from a seed page and publish cleaned texts
#[derive(Debug, clap::Args)]
pub struct HarvestArgs {
    /// First table of contents page
    #[clap(long)]
    pub seed: String,
    /// Output file, stdout when missing
    #[clap(parse(from_os_str), long, short)]
    pub output: Option<PathBuf>,
    /// Output format
    #[clap(arg_enum, long, default_value = "csv")]
    pub format: OutputFormat,
    /// Optional yaml harvest configuration file
    #[clap(env = "HEMICYCLE_CONFIG", parse(from_os_str), long)]
    pub config: Option<PathBuf>,
    /// Override the configured source profile
    #[clap(arg_enum, long)]
    pub profile: Option<Profile>,
    /// Override harvester's user agent
    #[clap(long)]
    pub user_agent: Option<String>,
    /// Override the per request timeout, in seconds
    #[clap(long)]
    pub timeout: Option<u64>,
    /// Override harvester's maximum concurrent document downloads
    #[clap(long)]
    pub concurrent_downloads: Option<usize>,
    /// Stop after this many pages
    #[clap(long)]
    pub max_pages: Option<usize>,
    /// Override pagination error handling strategy
    #[clap(arg_enum, long)]
    pub on_page_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[clap(long, short)]
    pub quiet: bool,
}

impl TryFrom<&HarvestArgs> for HarvestConfig {
    type Error = anyhow::Error;

    fn try_from(args: &HarvestArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            HarvestConfig::default()
        };
        if let Some(profile) = args.profile {
            conf.profile = profile.into();
        }
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(timeout) = args.timeout {
            conf.timeout_secs = timeout;
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(max_pages) = args.max_pages {
            conf.max_pages = Some(max_pages);
        }
        if let Some(on_page_error) = args.on_page_error {
            conf.on_page_error = on_page_error;
        }
        Ok(conf)
    }
}

pub fn harvest(args: HarvestArgs) -> anyhow::Result<()> {
    let config = HarvestConfig::try_from(&args)?;
    let harvester = Harvester::new(config)?;
    log::info!(
        "Harvesting {} from {}",
        harvester.config().profile.source_label,
        args.seed
    );

    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    let report = rt.block_on(harvester.run(&args.seed))?;

    if let Some(e) = &report.interrupted {
        log::warn!("Pagination stopped early: {e}");
    }
    if report.is_empty() {
        println!("No data scraped");
        return Ok(());
    }

    let mut writer = RecordWriter::open(args.format, args.output.as_deref())?;
    writer.publish(&report.records)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ArgEnum)]
pub enum DocumentFormat {
    Xml,
    Structured,
    Html,
}

impl From<DocumentFormat> for Format {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Xml => Format::Xml(XmlDialect::Generic),
            DocumentFormat::Structured => Format::Xml(XmlDialect::Structured),
            DocumentFormat::Html => Format::Html,
        }
    }
}

/// Extract the cleaned text of a single document and print it to stdout
#[derive(Debug, clap::Args)]
#[clap(group = clap::ArgGroup::new("document").required(true))]
pub struct ExtractArgs {
    /// A local document
    #[clap(group = "document", parse(from_os_str), long)]
    pub file: Option<PathBuf>,
    /// A distant document
    #[clap(group = "document", long)]
    pub url: Option<String>,
    /// Document format, guessed from the extension or content type when missing
    #[clap(arg_enum, long)]
    pub format: Option<DocumentFormat>,
    /// Source profile providing language and cleanup settings
    #[clap(arg_enum, long, default_value = "adopted-texts")]
    pub profile: Profile,
    /// Custom user agent to download the document
    #[clap(long, conflicts_with = "file")]
    pub ua: Option<String>,
}

pub fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let profile = SourceProfile::from(args.profile);

    let (body, detected) = if let Some(url) = args.url {
        let mut builder = reqwest::blocking::ClientBuilder::new();
        if let Some(ua) = args.ua {
            builder = builder.user_agent(ua);
        }
        let client = builder.build()?;
        let resp = client.get(&url).send()?.error_for_status()?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|c| c.to_str().ok())
            .map(String::from);
        let format = Format::detect(&url, content_type.as_deref(), profile.xml_dialect);
        (resp.bytes()?.to_vec(), format)
    } else if let Some(path) = args.file {
        let body = fs_err::read(&path)?;
        let format = Format::detect(&path.to_string_lossy(), None, profile.xml_dialect);
        (body, format)
    } else {
        anyhow::bail!("Missing `url` or `file`");
    };

    let format = args.format.map(Format::from).unwrap_or(detected);
    let text = profile.extractor()?.extract(&body, format)?;
    println!("{text}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Harvest(args) => {
            if !args.quiet {
                env_logger::Builder::from_env(
                    env_logger::Env::default()
                        .default_filter_or("hemicycle=info,hemicycle_crawler=info,hemicycle_extract=warn"),
                )
                .init();
            }
            harvest(args)
        }
        SubCommand::Extract(args) => {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("hemicycle_extract=warn"),
            )
            .init();
            extract(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "hemicycle", &mut io::stdout());
            Ok(())
        }
    }
}
