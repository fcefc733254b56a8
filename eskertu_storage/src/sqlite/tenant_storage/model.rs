use eskertu_models::{
    chrono::NaiveDate,
    tenant::{DUE_DATE_FORMAT, Tenant},
};

use crate::TenantReadError;

/// Row of the `tenants` table. `payment_date` is kept as text and parsed on read.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TenantStorageModel {
    pub id: i64,
    pub name: String,
    pub apartment: String,
    pub payment_date: String,
}

impl From<Tenant> for TenantStorageModel {
    fn from(value: Tenant) -> Self {
        Self {
            id: value.id,
            name: value.name,
            apartment: value.apartment,
            payment_date: format_due_date(value.due_date),
        }
    }
}

impl TryFrom<TenantStorageModel> for Tenant {
    type Error = TenantReadError;

    fn try_from(value: TenantStorageModel) -> Result<Self, Self::Error> {
        let due_date = match NaiveDate::parse_from_str(value.payment_date.trim(), DUE_DATE_FORMAT)
        {
            Ok(date) => date,
            Err(source) => {
                return Err(TenantReadError {
                    id: value.id,
                    raw: value.payment_date,
                    source,
                });
            }
        };

        Ok(Self {
            id: value.id,
            name: value.name,
            apartment: value.apartment,
            due_date,
        })
    }
}

pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}
