use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tabview::controller::Controller;
use tabview::loader::load_data_file;
use tabview::ui::TableUI;
use tabview::{Message, Model, Status, TVConfig, TVError, TableProps};

/// A tui based tabular data viewer with column filters and pagination.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data file to open (csv, parquet, arrow/ipc/feather)
    path: String,

    /// Rows per page: a number or "All"
    #[arg(short = 'n', long)]
    page_size: Option<String>,

    /// Filter COLUMN by VALUE (case-insensitive substring). Repeatable.
    #[arg(short, long = "filter", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Expose the query row search action
    #[arg(long)]
    searchable: bool,

    #[arg(long)]
    persist_search: bool,

    /// Text shown next to the table name when searchable
    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "")]
    download_url: String,

    /// Page to print with --print (1 based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Print one page to stdout instead of starting the viewer
    #[arg(long)]
    print: bool,

    /// Widest a column is drawn, in characters
    #[arg(long, default_value_t = 30)]
    max_column_width: usize,

    #[arg(long, default_value = "~/.tabview.log")]
    log_file: String,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((column, _)) if column.is_empty() => Err(format!("missing column in \"{s}\"")),
        Some((column, value)) => Ok((column.to_string(), value.to_string())),
        None => Ok((s.to_string(), String::new())),
    }
}

fn expand(path: &str) -> Result<PathBuf, TVError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| TVError::LoadingFailed(e.to_string()))
}

fn init_logging(log_file: &str) -> Result<(), TVError> {
    let file = File::create(expand(log_file)?)?;
    let filter = EnvFilter::try_from_env("TABVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Logging disabled: {e}");
    }

    match run(args) {
        Err(e) => {
            error!("{e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: Args) -> Result<(), TVError> {
    let config = TVConfig::default().max_column_width(args.max_column_width);
    let path = expand(&args.path)?;
    let (file_info, catalog) = load_data_file(path)?;

    let source = file_info.path.display().to_string();
    let props = TableProps::default()
        .with_searchable(args.searchable)
        .with_persist_search(args.persist_search)
        .with_searchable_description(args.description.clone())
        .with_download_url(args.download_url.clone())
        .with_refresh_query(move || info!("Refresh requested for {source}"));
    let mut model = Model::new(catalog, props, &config, file_info.name());

    if let Some(page_size) = &args.page_size {
        model.select_page_size(page_size)?;
    }
    if !args.filters.is_empty() {
        for (column, value) in &args.filters {
            model.add_column(column)?;
            model.set_value(column, value.as_str())?;
        }
        model.apply_filters()?;
    }

    if args.print {
        print_page(&mut model, args.page);
        Ok(())
    } else {
        run_tui(&config, &mut model)
    }
}

fn print_page(model: &mut Model, page: usize) {
    for _ in 1..page {
        model.next_page();
    }
    let header: Vec<&str> = model.catalog().column_names().collect();
    println!("{}", header.join("\t"));
    for row in model.page_rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        println!("{}", cells.join("\t"));
    }
    let pagination = model.pagination();
    println!("{} | {}", pagination.summary(), pagination.page_label());
}

fn run_tui(config: &TVConfig, model: &mut Model) -> Result<(), TVError> {
    let mut ui = TableUI::new(config);
    let controller = Controller::new(config);
    let mut terminal = ratatui::init();

    let result = (|| -> Result<(), TVError> {
        let size = terminal.size()?;
        model.update(Some(Message::Resize(size.width.into(), size.height.into())))?;
        while model.status != Status::QUITTING {
            terminal.draw(|f| ui.draw(model.get_uidata(), f))?;
            let message = controller.handle_event(model)?;
            model.update(message)?;
        }
        Ok(())
    })();

    ratatui::restore();
    result
}
