//! CSV export of the flat order report.
//!
//! One row per (order, line item) pair, with the order and customer fields
//! repeated on every row. Orders without line items produce no rows.

use csv::WriterBuilder;
use log::info;
use shared::OrderReportRow;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::commands::export::{GenerateReportCommand, GenerateReportResult};
use super::log_store_error;
use crate::storage::{OrderRepository, StoreError, StoreResult};

/// File name used when the caller does not choose one
pub const DEFAULT_REPORT_FILE: &str = "orders_report.csv";

pub const REPORT_HEADER: [&str; 6] = [
    "Order ID",
    "Customer ID",
    "Customer Name",
    "Order Date",
    "Product ID",
    "Quantity",
];

/// Export service that writes the order report
#[derive(Clone)]
pub struct ExportService {
    repository: OrderRepository,
    default_destination: PathBuf,
}

impl ExportService {
    pub fn new(repository: OrderRepository, default_destination: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            default_destination: default_destination.into(),
        }
    }

    pub fn default_destination(&self) -> &Path {
        &self.default_destination
    }

    /// Write the report to the requested path, or the default one
    pub async fn generate_report(&self, command: GenerateReportCommand) -> StoreResult<GenerateReportResult> {
        let file_path = match command.destination {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => self.default_destination.clone(),
        };
        info!("Generating order report at {:?}", file_path);

        let rows = self
            .repository
            .report_rows()
            .await
            .inspect_err(|e| log_store_error("generating report", e))?;

        write_report_file(&file_path, &rows).inspect_err(|e| log_store_error("generating report", e))?;

        let success_message = format!("Report generated and saved to '{}'.", file_path.display());
        info!("{} ({} rows)", success_message, rows.len());

        Ok(GenerateReportResult {
            file_path,
            row_count: rows.len(),
            success_message,
        })
    }
}

/// Encode the rows as CSV, header first, into any writer
pub fn write_report<W: Write>(writer: W, rows: &[OrderReportRow]) -> StoreResult<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the report through a temporary sibling file, then move it into place
fn write_report_file(path: &Path, rows: &[OrderReportRow]) -> StoreResult<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| StoreError::io(&temp_path, e))?;

    let written = write_report(BufWriter::new(file), rows)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e)));

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CustomerRepository, DbConnection, ProductRepository, Schema};
    use shared::LineItem;

    async fn setup_test() -> (ExportService, OrderRepository, i64, [i64; 2]) {
        let db = DbConnection::open_test().await.expect("Failed to open test database");
        Schema::new(db.clone()).create_tables().await.expect("Failed to create tables");
        let customer_id = CustomerRepository::new(db.clone())
            .add_customer("Smith, Jane", "jane@example.com")
            .await
            .expect("add customer");
        let products = ProductRepository::new(db.clone());
        let p1 = products.add_product("Widget", 1.0).await.expect("add product");
        let p2 = products.add_product("Gadget", 2.0).await.expect("add product");
        let orders = OrderRepository::new(db);
        let service = ExportService::new(orders.clone(), DEFAULT_REPORT_FILE);
        (service, orders, customer_id, [p1, p2])
    }

    #[tokio::test]
    async fn test_report_for_two_line_items_has_two_rows() {
        let (service, orders, customer_id, [p1, p2]) = setup_test().await;
        let order_id = orders
            .add_order(customer_id, "2024-06-01", &[LineItem::new(p1, 3), LineItem::new(p2, 1)])
            .await
            .expect("add order");

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.csv");
        let result = service
            .generate_report(GenerateReportCommand {
                destination: Some(path.clone()),
            })
            .await
            .expect("generate report");
        assert_eq!(result.row_count, 2);
        assert_eq!(result.file_path, path);

        let mut reader = csv::Reader::from_path(&path).expect("open report");
        let header = reader.headers().expect("header").clone();
        assert_eq!(header.iter().collect::<Vec<_>>(), REPORT_HEADER.to_vec());

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("record")).collect();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(&record[0], order_id.to_string());
            assert_eq!(&record[1], customer_id.to_string());
            assert_eq!(&record[2], "Smith, Jane");
            assert_eq!(&record[3], "2024-06-01");
        }
        assert_eq!((&records[0][4], &records[0][5]), (p1.to_string().as_str(), "3"));
        assert_eq!((&records[1][4], &records[1][5]), (p2.to_string().as_str(), "1"));
        assert!(!dir.path().join("report.csv.tmp").exists());
    }

    #[test]
    fn test_write_report_quotes_and_writes_header_when_empty() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[]).expect("write empty report");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "Order ID,Customer ID,Customer Name,Order Date,Product ID,Quantity\n"
        );

        let row = OrderReportRow {
            order_id: 1,
            customer_id: 2,
            customer_name: "Smith, Jane".to_string(),
            order_date: "2024-06-01".to_string(),
            product_id: 3,
            quantity: 4,
        };
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[row]).expect("write report");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.ends_with("1,2,\"Smith, Jane\",2024-06-01,3,4\n"), "got: {text}");
    }

    #[tokio::test]
    async fn test_failed_report_leaves_no_temp_file() {
        let (service, _, _, _) = setup_test().await;
        let dir = tempfile::tempdir().expect("temp dir");
        let destination = dir.path().join("out");
        fs::create_dir(&destination).expect("create dir");

        let err = service
            .generate_report(GenerateReportCommand {
                destination: Some(destination.clone()),
            })
            .await
            .expect_err("a directory is not a report file");
        assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");

        assert!(destination.is_dir());
        assert!(!dir.path().join("out.tmp").exists());
    }

    #[tokio::test]
    async fn test_report_reads_back_into_rows() {
        let (service, orders, customer_id, [p1, _]) = setup_test().await;
        let order_id = orders
            .add_order(customer_id, "2024-06-01", &[LineItem::new(p1, 3)])
            .await
            .expect("add order");

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.csv");
        service
            .generate_report(GenerateReportCommand {
                destination: Some(path.clone()),
            })
            .await
            .expect("generate report");

        let rows: Vec<OrderReportRow> = csv::Reader::from_path(&path)
            .expect("open report")
            .deserialize()
            .map(|r| r.expect("row"))
            .collect();
        assert_eq!(rows, orders.report_rows().await.expect("report rows"));
        assert_eq!(rows[0].order_id, order_id);
    }

    #[tokio::test]
    async fn test_missing_destination_uses_default() {
        let db = DbConnection::open_test().await.expect("Failed to open test database");
        Schema::new(db.clone()).create_tables().await.expect("Failed to create tables");
        let dir = tempfile::tempdir().expect("temp dir");
        let default_path = dir.path().join(DEFAULT_REPORT_FILE);
        let service = ExportService::new(OrderRepository::new(db), &default_path);

        let result = service
            .generate_report(GenerateReportCommand::default())
            .await
            .expect("generate report");

        assert_eq!(result.file_path, default_path);
        assert_eq!(result.row_count, 0);
        assert!(default_path.exists());
    }
}
