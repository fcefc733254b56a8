use chrono::NaiveDate;
use thiserror::Error;

pub type TenantId = i64;

/// Format used to store and display due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("tenant name must not be empty")]
    EmptyName,

    #[error("apartment label must not be empty")]
    EmptyApartment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub apartment: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    name: String,
    apartment: String,
    due_date: NaiveDate,
}

impl NewTenant {
    pub fn new(
        name: impl Into<String>,
        apartment: impl Into<String>,
        due_date: NaiveDate,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let apartment = apartment.into();

        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if apartment.trim().is_empty() {
            return Err(ModelError::EmptyApartment);
        }

        Ok(Self {
            name,
            apartment,
            due_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apartment(&self) -> &str {
        &self.apartment
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn into_tenant(self, id: TenantId) -> Tenant {
        Tenant {
            id,
            name: self.name,
            apartment: self.apartment,
            due_date: self.due_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn new_tenant_rejects_blank_name() {
        assert_eq!(NewTenant::new("  ", "12B", date()), Err(ModelError::EmptyName));
    }

    #[test]
    fn new_tenant_rejects_blank_apartment() {
        assert_eq!(
            NewTenant::new("Aigerim", "", date()),
            Err(ModelError::EmptyApartment)
        );
    }

    #[test]
    fn into_tenant_keeps_fields() {
        let tenant = NewTenant::new("Aigerim", "12B", date())
            .unwrap()
            .into_tenant(7);

        assert_eq!(tenant.id, 7);
        assert_eq!(tenant.name, "Aigerim");
        assert_eq!(tenant.apartment, "12B");
        assert_eq!(tenant.due_date, date());
    }
}
