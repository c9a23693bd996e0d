use api_types::{
    Envelope,
    expense::{Expense, ExpenseList, ExpenseUpdate, NewExpense},
};
use reqwest::Method;

use crate::{
    error::Result,
    transport::{Item, Transport},
};

const EXPENSES_PATH: &str = "/api/expenses";

/// Thin façade over the expense endpoints. Errors are returned unchanged.
#[derive(Clone, Debug)]
pub struct ExpenseRepository {
    transport: Transport,
}

impl ExpenseRepository {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Expense>> {
        let list: ExpenseList = self.transport.get_json(EXPENSES_PATH).await?;
        Ok(list.into_vec())
    }

    pub async fn create(&self, expense: &NewExpense) -> Result<Expense> {
        let created: Envelope<Expense> = self
            .transport
            .send_json(Method::POST, EXPENSES_PATH, Some(expense))
            .await?;
        Ok(created.into_inner())
    }

    pub async fn update(&self, id: &str, changes: &ExpenseUpdate) -> Result<Expense> {
        let updated: Envelope<Expense> = self
            .transport
            .send_json(Method::PUT, &item(id), Some(changes))
            .await?;
        Ok(updated.into_inner())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport
            .send_unit(Method::DELETE, &item(id), None::<&()>)
            .await
    }
}

fn item(id: &str) -> Item<'_> {
    Item {
        collection: EXPENSES_PATH,
        id,
    }
}
