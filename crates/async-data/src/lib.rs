//! Crate `async_data` — motor de propagación del ciclo de vida de una carga
//! asíncrona.
//!
//! Una carga expone cuatro eventos (`started`, `succeeded`, `failed`,
//! `finished`) como canales de un `Node`. Los nodos se encadenan con
//! `resolved*`/`map*` (cada llamada crea un hijo con sus propios canales) y
//! se unen con `all`. El futuro que hace el trabajo real es externo: basta con
//! que implemente `Thenable`.
//!
//! Diseño resumido:
//! - Un hilo, todo síncrono: un `dispatch` no retorna hasta que todos los
//!   descendientes lo procesaron.
//! - Replay: `succeeded`, `failed` y `finished` recuerdan su último valor, así
//!   que un hijo creado tarde nace con el resultado ya transformado.
//! - Composición en vez de herencia: `SourceNode` y `CombinedNode` poseen un
//!   `Node` y exponen el trait `AsyncData`.
//!
//! Ejemplo rápido:
//! ```rust
//! use async_data::{async_data, AsyncData, Deferred};
//!
//! let pending = Deferred::<u32, String>::new();
//! let handle = pending.clone();
//! let source = async_data(move |_: ()| handle.clone());
//! let doubled = source.map(|v| v * 2);
//!
//! source.load(()).unwrap();
//! assert!(doubled.is_loading());
//! pending.resolve(21).unwrap();
//! assert_eq!(doubled.value(), Some(42));
//! assert!(!doubled.is_loading());
//! ```
pub mod channel;
pub mod combined;
pub mod config;
pub mod errors;
pub mod node;
pub mod runtime;
pub mod source;
pub mod stubs;
pub mod thenable;

pub use channel::Channel;
pub use combined::{all, CombinedNode};
pub use config::{LoadPolicy, SourceConfig};
pub use errors::{AsyncDataError, Result};
pub use node::{AsyncData, Node};
pub use runtime::LocalTask;
pub use source::{async_data, SourceNode};
pub use stubs::Deferred;
pub use thenable::{Outcome, Thenable};
