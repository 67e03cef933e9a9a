use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::core::purchase_order::PurchaseOrder;
use crate::core::types::PurchaseOrderId;
use crate::orders::store::JsonOrderStore;

#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List all purchase orders in a store
    List {
        /// Purchase-order store JSON
        #[arg(long)]
        orders: PathBuf,
    },

    /// Show one purchase order in full
    Show {
        /// Purchase-order id
        id: String,

        /// Purchase-order store JSON
        #[arg(long)]
        orders: PathBuf,
    },
}

/// Execute the orders subcommand
///
/// # Errors
///
/// Returns an error when the store cannot be loaded or the requested id
/// does not exist.
pub fn run(args: OrdersArgs, format: OutputFormat) -> anyhow::Result<()> {
    match args.command {
        OrdersCommand::List { orders } => {
            let store = JsonOrderStore::load_from_file(&orders)?;
            match format {
                OutputFormat::Text => {
                    println!("{} purchase orders", store.len());
                    for order in &store.orders {
                        println!(
                            "  {}  {}  {}  ({} lines)",
                            order.id,
                            order.po_number,
                            order.vendor.name,
                            order.items.len()
                        );
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&store.orders)?);
                }
            }
        }
        OrdersCommand::Show { id, orders } => {
            let store = JsonOrderStore::load_from_file(&orders)?;
            let order = store
                .get(&PurchaseOrderId::new(&id))
                .ok_or_else(|| anyhow::anyhow!("purchase order {id} not found in store"))?;
            match format {
                OutputFormat::Text => print_order(order),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(order)?),
            }
        }
    }

    Ok(())
}

fn print_order(order: &PurchaseOrder) {
    println!("{} ({})", order.po_number, order.id);
    println!("Vendor: {}", order.vendor.name);
    for item in &order.items {
        let lot = item
            .lot_number
            .as_deref()
            .map(|l| format!(" lot {l}"))
            .unwrap_or_default();
        println!(
            "  {:>3}  {}  {}  qty {}  @ {}{lot}",
            item.line_number, item.identifier, item.description, item.quantity, item.unit_price
        );
    }
}
