pub mod crm;
pub mod employee;
pub mod hrms;
pub mod payroll;
pub mod user;
