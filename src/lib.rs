//! # GeoMoves
//!
//! Animated maps of a family's migrations, one generation at a time.
//!
//! Starting from one person, GeoMoves walks their descendants level by
//! level, turns every dated and geocoded life event into a map mark, and
//! draws each person's moves as a path. A timer reveals one more generation
//! per tick until the configured depth is reached.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌──────────────┐
//! │  JSON tree   │──▶│   geomoves-core    │──▶│  MapSurface  │
//! │ family_file  │   │ walker · extract · │   │ terminal or  │
//! └──────────────┘   │ aggregate · anim.  │   │ JSON lines   │
//!                    └─────────▲──────────┘   └──────────────┘
//!                              │ ticks
//!                       ┌──────┴──────┐
//!                       │ TokioTimer  │
//!                       └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! geomoves animate I0001                 # timed animation on stdout
//! geomoves levels I0001                  # who is drawn at which level
//! geomoves marks I0001                   # one person's marks
//! geomoves describe I0001 P0003          # events of I0001 at place P0003
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`family_file`] | JSON family-tree loading |
//! | [`driver`] | Tokio timer and animation loop |
//! | [`render`] | Terminal and JSON map surfaces |
//! | [`animate`] | `geomoves animate` |
//! | [`inspect`] | `geomoves levels`, `marks`, `describe` |
//! | [`logging`] | tracing subscriber setup |

pub mod animate;
pub mod config;
pub mod driver;
pub mod family_file;
pub mod inspect;
pub mod logging;
pub mod render;
