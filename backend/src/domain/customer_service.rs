use log::{info, warn};
use shared::Customer;

use super::commands::customer::{AddCustomerCommand, AddCustomerResult, UpdateCustomerCommand};
use super::commands::ChangeResult;
use super::log_store_error;
use crate::storage::{CustomerRepository, StoreResult};

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    repository: CustomerRepository,
}

impl CustomerService {
    pub fn new(repository: CustomerRepository) -> Self {
        Self { repository }
    }

    /// Create a new customer
    pub async fn add_customer(&self, command: AddCustomerCommand) -> StoreResult<AddCustomerResult> {
        info!("Adding customer: name={}, email={}", command.name, command.email);

        let id = self
            .repository
            .add_customer(&command.name, &command.email)
            .await
            .inspect_err(|e| log_store_error("adding customer", e))?;

        let success_message = format!("Customer '{}' added with ID '{}'.", command.name, id);
        info!("{}", success_message);

        Ok(AddCustomerResult {
            customer: Customer {
                id,
                name: command.name,
                email: command.email,
            },
            success_message,
        })
    }

    /// Replace a customer's name and email
    pub async fn update_customer(&self, command: UpdateCustomerCommand) -> StoreResult<ChangeResult> {
        info!("Updating customer: {}", command.customer_id);

        let found = self
            .repository
            .update_customer(command.customer_id, &command.name, &command.email)
            .await
            .inspect_err(|e| log_store_error("updating customer", e))?;

        let message = if found {
            format!("Customer ID '{}' updated.", command.customer_id)
        } else {
            warn!("Customer not found: {}", command.customer_id);
            format!("Customer ID '{}' not found; nothing updated.", command.customer_id)
        };

        Ok(ChangeResult {
            id: command.customer_id,
            found,
            message,
        })
    }

    /// Delete a customer with no orders
    pub async fn delete_customer(&self, customer_id: i64) -> StoreResult<ChangeResult> {
        info!("Deleting customer: {}", customer_id);

        let found = self
            .repository
            .delete_customer(customer_id)
            .await
            .inspect_err(|e| log_store_error("deleting customer", e))?;

        let message = if found {
            format!("Customer ID '{}' deleted.", customer_id)
        } else {
            warn!("Customer not found: {}", customer_id);
            format!("Customer ID '{}' not found; nothing deleted.", customer_id)
        };

        Ok(ChangeResult {
            id: customer_id,
            found,
            message,
        })
    }

    pub async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let customers = self
            .repository
            .list_customers()
            .await
            .inspect_err(|e| log_store_error("listing customers", e))?;
        info!("Found {} customers", customers.len());
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, Schema, StoreError};

    async fn setup_test() -> (DbConnection, CustomerService) {
        let db = DbConnection::open_test().await.expect("Failed to open test database");
        Schema::new(db.clone()).create_tables().await.expect("Failed to create tables");
        (db.clone(), CustomerService::new(CustomerRepository::new(db)))
    }

    fn add(name: &str, email: &str) -> AddCustomerCommand {
        AddCustomerCommand {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_customer_reports_new_id() {
        let (_db, service) = setup_test().await;

        let result = service.add_customer(add("Ada", "ada@example.com")).await.expect("add");

        assert_eq!(result.customer.name, "Ada");
        assert_eq!(
            result.success_message,
            format!("Customer 'Ada' added with ID '{}'.", result.customer.id)
        );
        assert_eq!(service.list_customers().await.expect("list"), vec![result.customer]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_customer_are_not_errors() {
        let (_db, service) = setup_test().await;

        let update = service
            .update_customer(UpdateCustomerCommand {
                customer_id: 5,
                name: "Nobody".to_string(),
                email: "nobody@example.com".to_string(),
            })
            .await
            .expect("update");
        assert!(!update.found);
        assert_eq!(update.message, "Customer ID '5' not found; nothing updated.");

        let delete = service.delete_customer(5).await.expect("delete");
        assert!(!delete.found);
    }

    #[tokio::test]
    async fn test_delete_refusal_is_distinct_from_storage_failure() {
        let (db, service) = setup_test().await;
        let customer = service.add_customer(add("Ada", "ada@example.com")).await.expect("add").customer;
        db.execute(
            "INSERT INTO orders (customer_id, order_date) VALUES (?, '2024-01-01')",
            &[customer.id.into()],
        )
        .await
        .expect("insert order");

        let err = service.delete_customer(customer.id).await.expect_err("refused");
        assert!(err.refusal().is_some());

        db.close().await;
        let err = service.delete_customer(customer.id).await.expect_err("closed");
        assert!(matches!(err, StoreError::NotConnected));
    }
}
