pub mod doc;
pub mod domain;
pub mod expand;
pub mod extract;
pub mod model;
pub mod render;

pub use domain::{Domain, VarCatalog};
pub use expand::{expand, ExpandError};
pub use model::{AccessInst, ConcreteReg, EncField, ExecState, Template, VarSlot};
