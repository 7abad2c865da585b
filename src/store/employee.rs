use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::finalize::ports::EmployeeDirectory;
use crate::model::employee::Employee;

pub struct SqlEmployeeDirectory {
    pool: MySqlPool,
}

impl SqlEmployeeDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for SqlEmployeeDirectory {
    async fn list_active_employees(&self) -> Result<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, employee_code, first_name, last_name, email, department_id, \
                    hire_date, status \
             FROM employees WHERE status = 'active'",
        )
        .fetch_all(&self.pool)
        .await
        .context("active employee listing failed")
    }
}
