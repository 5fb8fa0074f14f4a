//! # Repo KB
//!
//! A local catalog of known repositories, kept inside a single Markdown
//! document that people edit by hand as well.
//!
//! The document is mostly free-form prose with one pipe table under the
//! `## 仓库列表` heading. That table is the record store: every command
//! reads the file, parses the table, optionally rewrites it, and writes the
//! whole document back with all surrounding prose preserved.
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────┐
//! │  kb CLI  │──▶│  catalog  │──▶│  document  │
//! │  (clap)  │   │  search   │   │ parse/ser. │
//! └──────────┘   └─────┬─────┘   └────────────┘
//!                      ▼
//!                ┌───────────┐
//!                │   store   │  <root>/CLAUDE.md
//!                └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kb init ~/kb
//! kb add ~/kb --name ripgrep --summary "Fast line-oriented search"
//! kb list ~/kb
//! kb find ~/kb --query grep
//! kb get-path ~/kb --name ripgrep
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Record and search result types |
//! | [`document`] | Parsing and rewriting the document |
//! | [`template`] | Default document content |
//! | [`store`] | Path resolution and file I/O |
//! | [`catalog`] | Initialize, upsert, list |
//! | [`search`] | Search and path lookup |
//! | [`logging`] | Tracing subscriber setup |
//! | [`error`] | Error types |

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod store;
pub mod template;
