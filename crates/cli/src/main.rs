//! Gifticon CLI - Manage a local voucher wallet from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List vouchers grouped into active / used / expired, with reminders
//! gifticon list
//!
//! # Register a voucher
//! gifticon add -n "아메리카노" -s "스타벅스" -a 4,500 -e 2025-07-05
//!
//! # Recognise gallery images (prints registration drafts)
//! gifticon scan ~/Pictures/coupon1.png ~/Pictures/coupon2.jpg
//!
//! # Share texts for a voucher
//! gifticon share 1719800000000 -m "생일 축하해!"
//!
//! # Save OCR settings
//! gifticon settings set -p openai -k sk-...
//! ```
//!
//! # Commands
//!
//! - `list` / `show` - Browse vouchers with expiry badges
//! - `add` / `use` / `notify` - Register, redeem, toggle nearby notifications
//! - `notifications` - Expiry reminders
//! - `scan` - Camera or gallery recognition
//! - `share` - Clipboard, KakaoTalk and email texts
//! - `settings` - OCR provider and key
//! - `seed` - Insert the sample vouchers
//!
//! Data lives in `GIFTICON_DATA_DIR` (default `./data`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gifticon_core::{VoucherId, Won};

mod commands;

#[derive(Parser)]
#[command(name = "gifticon")]
#[command(author, version, about = "Gifticon Wallet CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List vouchers and expiry reminders
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show one voucher in detail
    Show {
        /// Voucher id
        id: VoucherId,
    },
    /// Register a voucher
    Add {
        /// Product name (e.g. "아메리카노")
        #[arg(short, long)]
        name: String,

        /// Issuing store (e.g. "스타벅스")
        #[arg(short, long)]
        store: String,

        /// Amount in won (`4500`, `4,500` or `4,500원`)
        #[arg(short, long)]
        amount: Won,

        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: NaiveDate,

        /// Barcode number
        #[arg(long)]
        barcode: Option<String>,

        /// QR code payload
        #[arg(long)]
        qr_code: Option<String>,

        /// Who sent the voucher
        #[arg(long)]
        gifter: Option<String>,

        /// Reference to the voucher image
        #[arg(long)]
        image: Option<String>,
    },
    /// Mark a voucher as used
    Use {
        /// Voucher id
        id: VoucherId,
    },
    /// Toggle nearby-store notifications for a voucher
    Notify {
        /// Voucher id
        id: VoucherId,
    },
    /// Print expiry reminders
    Notifications,
    /// Recognise voucher images
    Scan {
        /// Image files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Camera flow: recognise the first file without validation
        #[arg(long)]
        camera: bool,
    },
    /// Print share texts for a voucher
    Share {
        /// Voucher id
        id: VoucherId,

        /// Personal message to include
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Manage OCR settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Insert the sample vouchers
    Seed,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the saved provider
    Show,
    /// Save provider and API key
    Set {
        /// Provider (`openai`, `google`, `aws`, `azure`)
        #[arg(short, long)]
        provider: String,

        /// Provider API key
        #[arg(short = 'k', long)]
        api_key: String,
    },
    /// Remove saved settings
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = commands::open_wallet().await?;

    match cli.command {
        Commands::List { json } => commands::vouchers::list(&wallet, json).await?,
        Commands::Show { id } => commands::vouchers::show(&wallet, id).await?,
        Commands::Add {
            name,
            store,
            amount,
            expiry,
            barcode,
            qr_code,
            gifter,
            image,
        } => {
            let mut input = gifticon_core::NewVoucher::new(name, store, amount, expiry);
            input.barcode = barcode;
            input.qr_code = qr_code;
            input.gifter = gifter;
            input.image = image;
            commands::vouchers::add(&wallet, input).await?;
        }
        Commands::Use { id } => commands::vouchers::mark_used(&wallet, id).await?,
        Commands::Notify { id } => commands::vouchers::toggle_notification(&wallet, id).await?,
        Commands::Notifications => commands::vouchers::notifications(&wallet).await?,
        Commands::Scan { files, camera } => commands::scan::run(&wallet, &files, camera).await?,
        Commands::Share { id, message } => {
            commands::vouchers::share(&wallet, id, message.as_deref()).await?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&wallet).await?,
            SettingsAction::Set { provider, api_key } => {
                commands::settings::set(&wallet, &provider, &api_key).await?;
            }
            SettingsAction::Clear => commands::settings::clear(&wallet).await?,
        },
        Commands::Seed => commands::vouchers::seed(&wallet).await?,
    }
    Ok(())
}
