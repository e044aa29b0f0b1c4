//! Pure payload validation. Runs before any store call and never queries
//! storage; uniqueness is the store's concern.

use crate::entity::{AccountPatch, ItemPatch, NewAccount, NewItem};
use crate::error::AppError;

pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn check_email(field: &str, value: &str) -> Result<(), AppError> {
    if !value.contains('@') || value.len() < 3 {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

fn check_price(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!("{} must be a non-negative number", field)));
    }
    Ok(())
}

impl Validate for NewAccount {
    fn validate(&self) -> Result<(), AppError> {
        require("handle", &self.handle)?;
        require("password", &self.password)?;
        require("email", &self.email)?;
        check_email("email", &self.email)?;
        Ok(())
    }
}

impl Validate for AccountPatch {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(handle) = &self.handle {
            require("handle", handle)?;
        }
        if let Some(password) = &self.password {
            require("password", password)?;
        }
        if let Some(email) = &self.email {
            require("email", email)?;
            check_email("email", email)?;
        }
        Ok(())
    }
}

impl Validate for NewItem {
    fn validate(&self) -> Result<(), AppError> {
        require("name", &self.name)?;
        check_price("price", self.price)?;
        Ok(())
    }
}

impl Validate for ItemPatch {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(price) = self.price {
            check_price("price", price)?;
        }
        Ok(())
    }
}
