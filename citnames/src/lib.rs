// SPDX-License-Identifier: GPL-3.0-or-later

pub mod args;
pub mod config;
pub mod environment;
pub mod execution;
pub mod output;
pub mod semantic;
