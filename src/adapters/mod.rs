//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements             | Connects to               |
//! |----------------|------------------------|---------------------------|
//! | `log_sink`     | EventSink              | `log` facade              |
//! | `console_log`  | `log::Log`             | stderr                    |
//! | `config_file`  | ConfigPort             | JSON file on disk         |
//! | `config_store` | ConfigPort             | in-memory postcard record |
//! | `time`         | -                      | `std::time::Instant`      |
//! | `sim`          | KnobPort, SensorPort,  | simulated board           |
//! |                | CommandPort, Display   |                           |

pub mod config_file;
pub mod config_store;
pub mod console_log;
pub mod log_sink;
pub mod sim;
pub mod time;
