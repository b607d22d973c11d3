//! `gb2mint_core` is the core library for the gb2mint migration tool. It
//! rewrites GitBook-style block directives (`{% hint %}`, `{% tabs %}`,
//! `{% embed %}`) into the JSX-like components Mintlify renders (`<Warning>`,
//! `<Tabs>`, `<iframe>`), without parsing markdown into a tree.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document text
//!   → hints   ({% hint style="…" %} → <Info>, <Warning>, …)
//!   → tabs    ({% tab title="…" %} → <Tab>, then {% tabs %} → <Tabs>)
//!   → videos  ({% embed url="…" %} → <iframe>)
//!   → figures (opt-in: exported <figure> images → ![caption](src))
//!   → title   (opt-in: first # Heading → front-matter title)
//! ```
//!
//! Stages are pure functions. Text a stage does not recognise, including a
//! directive with a malformed attribute, passes through unchanged, and a
//! stage applied to its own output is a no-op.
//!
//! ## Modules
//!
//! - [`stages`]: one module per directive family.
//! - [`config`]: `gb2mint.toml` loading and the flattened
//!   [`ConvertOptions`].
//! - [`project`]: file discovery, batch conversion and writing results.
//!
//! ## Quick Start
//!
//! ```rust
//! use gb2mint_core::Pipeline;
//! use gb2mint_core::Stage;
//!
//! let pipeline = Pipeline::with_stages([Stage::Videos, Stage::Hints]);
//! let conversion = pipeline.convert("{% hint style=\"tip\" %}Use tabs{% endhint %}");
//!
//! assert_eq!(conversion.output, "<Tip>Use tabs</Tip>");
//! assert_eq!(conversion.report.count(Stage::Hints), 1);
//! ```

pub use callout::*;
pub use config::*;
pub use directives::*;
pub use error::*;
pub use pipeline::*;
pub use stages::*;

mod callout;
pub mod config;
mod directives;
#[allow(unused_assignments)]
mod error;
mod pipeline;
pub mod project;
pub mod stages;
