//! # kanbon-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(test)]
mod testing;

pub use services::{
    AccountService, AuthService, AuthorizationService, EventDispatcher, FieldService,
    FormService, LogMailer, Mailer, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SystemMessageService, VerificationService,
};
