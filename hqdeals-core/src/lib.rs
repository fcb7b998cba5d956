pub mod card;
pub mod error;
pub mod loader;
pub mod page;
pub mod report;
pub mod state;

pub use error::CoreError;
pub use loader::{DealsLoader, LoadEvent, LoadOutcome, create_load_channel};
pub use page::PageView;
pub use state::{DealsState, OfferTicket};

use colored::Colorize;

const BANNER: &str = r#"
  ██╗  ██╗ ██████╗     ██████╗ ███████╗ █████╗ ██╗     ███████╗
  ██║  ██║██╔═══██╗    ██╔══██╗██╔════╝██╔══██╗██║     ██╔════╝
  ███████║██║   ██║    ██║  ██║█████╗  ███████║██║     ███████╗
  ██╔══██║██║▄▄ ██║    ██║  ██║██╔══╝  ██╔══██║██║     ╚════██║
  ██║  ██║╚██████╔╝    ██████╔╝███████╗██║  ██║███████╗███████║
  ╚═╝  ╚═╝ ╚══▀▀═╝     ╚═════╝ ╚══════╝╚═╝  ╚═╝╚══════╝╚══════╝
"#;

pub fn banner_lines() -> impl Iterator<Item = &'static str> {
    BANNER.lines().filter(|line| !line.is_empty())
}

pub fn print_banner() {
    for line in banner_lines() {
        println!("{}", line.bright_yellow().bold());
    }
    println!(
        "  {}\n",
        format!("v{} - discounted offers, hand picked", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
