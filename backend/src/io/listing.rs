//! Text rendering of query results, shared by the menu and the one-shot commands.

use std::io::{self, Write};

use shared::{Customer, Order, OrderWithItems, Product};

pub fn write_orders<W: Write>(out: &mut W, orders: &[OrderWithItems]) -> io::Result<()> {
    writeln!(out, "All Orders:")?;
    for entry in orders {
        writeln!(out, "{}", entry.order)?;
        for item in &entry.line_items {
            writeln!(out, "    {}", item)?;
        }
    }
    Ok(())
}

pub fn write_search_results<W: Write>(out: &mut W, customer_name: &str, orders: &[Order]) -> io::Result<()> {
    writeln!(out, "Orders for customer '{}':", customer_name)?;
    if orders.is_empty() {
        writeln!(out, "No orders found.")?;
    }
    for order in orders {
        writeln!(out, "{}", order)?;
    }
    Ok(())
}

pub fn write_customers<W: Write>(out: &mut W, customers: &[Customer]) -> io::Result<()> {
    writeln!(out, "All Customers:")?;
    for customer in customers {
        writeln!(out, "{}", customer)?;
    }
    Ok(())
}

pub fn write_products<W: Write>(out: &mut W, products: &[Product]) -> io::Result<()> {
    writeln!(out, "All Products:")?;
    for product in products {
        writeln!(out, "{}", product)?;
    }
    Ok(())
}
