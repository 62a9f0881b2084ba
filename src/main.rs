mod app;
mod data;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the decision graph JSON file.
    #[arg(long, default_value = "decision-graph.json")]
    graph_path: String,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "decigraph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::DecisionViewerApp::new(
                cc,
                args.graph_path.clone(),
            )))
        }),
    )
}
