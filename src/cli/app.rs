use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use soupchef::{
    BlobFormat, CollectionConfig, FileStore, KeyValueStore, MenuItem, MenuItemOption, MenuLookup,
    MenuStore, NoopDonations, Order, OrderStore,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "soupchef")]
#[command(about = "Browse the soup menu and place orders against a shared data directory")]
pub struct App {
    /// Directory holding the shared key-value suite
    #[arg(long, env = "SOUPCHEF_DATA_DIR", default_value = "soupchef-data")]
    data_dir: PathBuf,

    /// Blob encoding: msgpack or json
    #[arg(long, default_value = "msgpack", value_parser = parse_format)]
    format: BlobFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List menu items
    Menu {
        /// Include unavailable items
        #[arg(long)]
        all: bool,
    },
    /// Place an order
    Order {
        item: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Topping: "Cheese", "Red Pepper" or "Croutons"
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Show order history, newest first
    History,
    /// Flip an item between available and unavailable
    Toggle { item: String },
}

fn parse_format(value: &str) -> std::result::Result<BlobFormat, String> {
    value.parse().map_err(|err: soupchef::SoupError| err.to_string())
}

impl App {
    pub async fn run(self) -> Result<()> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&self.data_dir));
        let config = CollectionConfig::new().format(self.format);
        let donations = Arc::new(NoopDonations);

        let menu = MenuStore::open(store.clone(), config.clone(), donations.clone())
            .await
            .with_context(|| format!("opening menu in '{}'", self.data_dir.display()))?;

        let mut orders = None;
        match self.command {
            Command::Menu { all } => {
                let items = if all {
                    menu.all_items()
                } else {
                    menu.available_items()
                };
                for item in items {
                    println!("{}", describe_item(&item));
                }
            }
            Command::Order {
                item,
                quantity,
                options,
            } => {
                let menu_item = menu
                    .find_item(&item)
                    .ok_or_else(|| anyhow!("'{}' is not on the menu", item))?;
                if !menu_item.is_available() {
                    return Err(anyhow!("'{}' is currently unavailable", item));
                }
                let options = options
                    .iter()
                    .map(|raw| raw.parse::<MenuItemOption>())
                    .collect::<soupchef::Result<Vec<_>>>()?;
                let order = Order::new(quantity, menu_item, options)?;

                let order_store = OrderStore::open(store.clone(), config, donations).await?;
                let total = order.total();
                order_store.place_order(order);
                orders = Some(order_store);
                println!("Ordered {} x {} (total ${})", quantity, item, total);
            }
            Command::History => {
                let order_store = OrderStore::open(store.clone(), config, donations).await?;
                for order in order_store.order_history() {
                    let options: Vec<&str> = order
                        .menu_item_options()
                        .iter()
                        .map(MenuItemOption::raw_value)
                        .collect();
                    println!(
                        "{}  {} x {} [{}]  ${}",
                        order.date().format("%Y-%m-%d %H:%M"),
                        order.quantity(),
                        order.menu_item().item_name(),
                        options.join(", "),
                        order.total()
                    );
                }
                orders = Some(order_store);
            }
            Command::Toggle { item } => {
                let current = menu
                    .find_item(&item)
                    .ok_or_else(|| anyhow!("'{}' is not on the menu", item))?;
                let updated = menu.set_availability(&item, !current.is_available())?;
                println!("{}", describe_item(&updated));
            }
        }

        match orders {
            Some(orders) => {
                futures::try_join!(menu.close(), orders.close())?;
            }
            None => menu.close().await?,
        }
        Ok(())
    }
}

fn describe_item(item: &MenuItem) -> String {
    let mut line = format!("{:<24} ${}", item.item_name(), item.price());
    if item.is_daily_special() {
        line.push_str("  (daily special)");
    }
    if !item.is_available() {
        line.push_str("  [unavailable]");
    }
    line
}
