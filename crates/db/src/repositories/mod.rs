//! Repository abstractions for data access.
//!
//! One repository per `sales` table. Every repository borrows a connection
//! (a pool or an open transaction) and scopes its queries by the parent keys
//! of the resource.

pub mod account;
pub mod account_contract;
pub mod account_list;
pub mod account_product;
pub mod address;
pub mod email;
pub mod entity;
pub mod entity_account;
pub mod individual;
pub mod invoice;
pub mod invoice_item;
mod line_item;
pub mod non_individual;
pub mod number;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_list;
pub mod product_list_item;
pub mod session;
pub mod sys_user;
pub mod website;

pub use account::{AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use account_contract::{
    AccountContractRepository, CreateAccountContractInput, UpdateAccountContractInput,
};
pub use account_list::{AccountListRepository, CreateAccountListInput, UpdateAccountListInput};
pub use account_product::{
    AccountProductRepository, CreateAccountProductInput, UpdateAccountProductInput,
};
pub use address::{AddressInput, AddressParent, AddressRepository};
pub use email::{CreateEmailInput, EmailRepository, UpdateEmailInput};
pub use entity::{EntityRepository, UpdateEntityInput};
pub use entity_account::{EntityAccountInput, EntityAccountRepository, LinkScope};
pub use individual::{CreateIndividualInput, IndividualRepository, UpdateIndividualInput};
pub use invoice::{CreateInvoiceInput, InvoiceRepository, UpdateInvoiceInput};
pub use invoice_item::{CreateInvoiceItemInput, InvoiceItemRepository, UpdateInvoiceItemInput};
pub use non_individual::{
    CreateNonIndividualInput, NonIndividualRepository, UpdateNonIndividualInput,
};
pub use number::{CreateNumberInput, NumberRepository, UpdateNumberInput};
pub use order::{CreateOrderInput, OrderRepository, UpdateOrderInput};
pub use order_item::{CreateOrderItemInput, OrderItemRepository, UpdateOrderItemInput};
pub use product::{CreateProductInput, ProductRepository, UpdateProductInput};
pub use product_list::{CreateProductListInput, ProductListRepository, UpdateProductListInput};
pub use product_list_item::{
    CreateProductListItemInput, ProductListItemRepository, UpdateProductListItemInput,
};
pub use session::SessionService;
pub use sys_user::{SignUpInput, SysUserRepository, UpdateSysUserInput};
pub use website::{CreateWebsiteInput, UpdateWebsiteInput, WebsiteRepository};
