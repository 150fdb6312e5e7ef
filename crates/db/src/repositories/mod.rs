//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod invoice;
pub mod invoice_item;

pub use invoice::{
    CreateInvoiceInput, InvoiceError, InvoiceFilter, InvoiceRecord, InvoiceRepository,
    UpdateInvoiceInput,
};
pub use invoice_item::{
    CreateLineItemInput, InvoiceItemError, InvoiceItemRepository, UpdateLineItemInput,
};
