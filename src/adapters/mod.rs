//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter             | Implements         | Connects to               |
//! |---------------------|--------------------|---------------------------|
//! | `memory_repository` | NetworkRepository  | in-memory table / postcard|
//! | `clock`             | Clock              | `std::time` or manual     |
//! | `log_sink`          | EventSink          | `log` output              |

pub mod clock;
pub mod log_sink;
pub mod memory_repository;
