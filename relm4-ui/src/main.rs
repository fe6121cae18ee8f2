mod logging;
mod report_panel;
mod utils;

use std::sync::Arc;

use relm4::RelmApp;
use reports_api::{ApiClient, ops::SchoolReportsApi};

use crate::report_panel::{ReportPanelInit, ReportPanelModel};

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

fn main() {
    let _guard = logging::init_logging();

    let server_url =
        std::env::var("SFR_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let api: Arc<dyn SchoolReportsApi> = match ApiClient::new(&server_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Invalid server URL {}: {}", server_url, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using report server at {}", server_url);

    let app = RelmApp::new("org.sfreports.desktop");
    app.run::<ReportPanelModel>(ReportPanelInit { api });
}
