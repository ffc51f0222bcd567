//! Execution Log Viewer (exlv)
//!
//! Virtualized viewer for the log chunk of one node/step execution.
//!
//! The pure core ([`store`], [`virtual_list`], [`state`], [`events`] and the
//! [`viewer`] that composes them) never touches a terminal. The impure shell
//! ([`source`], [`view`], [`logging`], [`config`]) wires it to files and
//! crossterm.

pub mod config;
pub mod events;
pub mod integration;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod store;
pub mod view;
pub mod viewer;
pub mod virtual_list;
