use clap::Parser;
use rocket::{error, info};
use signage_api::api::status::built_info;

#[derive(Parser)]
#[command(name = "signage-api")]
#[command(about = "Schedule and weather server for a venue display sign")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,
}

#[rocket::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("signage-api {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    dotenvy::dotenv().ok();

    info!("Signage API v{} starting", built_info::PKG_VERSION);
    if let Some(commit) = built_info::GIT_COMMIT_HASH {
        info!("Git commit: {}", commit);
    }

    let rocket = match signage_api::rocket() {
        Ok(rocket) => rocket,
        Err(e) => {
            eprintln!("signage-api: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rocket.launch().await {
        error!("Rocket server failed: {}", e);
        std::process::exit(1);
    }
}
