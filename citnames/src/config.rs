// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the configuration of the application.
//!
//! The configuration is either loaded from a file or used with default
//! values, which are defined in the code. The configuration tells which
//! programs are compilers beyond the built-in name patterns, and which
//! programs shall never be treated as compiler calls.
//!
//! The configuration file syntax is based on the YAML format.
//! The default configuration file name is `citnames.yml`.
//!
//! The configuration file location is searched in the following order:
//! 1. The current working directory
//! 2. The local configuration directory of the user
//! 3. The configuration directory of the user
//! 4. The local configuration directory of the application
//! 5. The configuration directory of the application
//!
//! ```yaml
//! schema: 4.0
//!
//! compilers:
//!   - path: /usr/local/bin/my-cc
//!     as: gcc
//!   - path: /opt/bin/buildcache
//!     as: wrapper
//!   - path: /usr/bin/cc
//!     ignore: true
//! ```

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::{ValidationError, Validator};

mod types {
    use serde::de::{self, Visitor};
    use std::fmt;
    use std::path::PathBuf;

    pub const SUPPORTED_SCHEMA_VERSION: &str = "4.0";

    /// Represents the application configuration.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        #[serde(default)]
        pub compilers: Vec<Compiler>,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                compilers: vec![],
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Configuration:")?;
            let yaml_string = serde_saphyr::to_string(self).map_err(|_| fmt::Error)?;
            for line in yaml_string.lines() {
                writeln!(f, "{line}")?;
            }
            Ok(())
        }
    }

    /// Represents compiler configuration matching the YAML format.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Compiler {
        pub path: PathBuf,
        #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
        pub as_: Option<CompilerType>,
        #[serde(default)]
        pub ignore: bool,
    }

    /// Tool families a configured program can be recognized as.
    #[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum CompilerType {
        #[serde(alias = "gcc", alias = "gnu")]
        Gcc,
        #[serde(alias = "clang", alias = "llvm")]
        Clang,
        #[serde(alias = "fortran", alias = "gfortran", alias = "flang")]
        Flang,
        #[serde(alias = "ifort", alias = "intel-fortran", alias = "intel_fortran")]
        IntelFortran,
        #[serde(alias = "crayftn", alias = "cray-fortran", alias = "cray_fortran")]
        CrayFortran,
        #[serde(alias = "nvcc", alias = "cuda")]
        Cuda,
        #[serde(alias = "mpicc", alias = "openmpi", alias = "mpich")]
        Mpi,
        #[serde(alias = "ccache", alias = "distcc", alias = "sccache")]
        Wrapper,
        #[serde(alias = "ld")]
        Linker,
        #[serde(alias = "ar")]
        Archiver,
    }

    impl fmt::Display for CompilerType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let name = match self {
                CompilerType::Gcc => "GCC",
                CompilerType::Clang => "Clang",
                CompilerType::Flang => "Flang",
                CompilerType::IntelFortran => "Intel Fortran",
                CompilerType::CrayFortran => "Cray Fortran",
                CompilerType::Cuda => "CUDA",
                CompilerType::Mpi => "MPI",
                CompilerType::Wrapper => "Wrapper",
                CompilerType::Linker => "Linker",
                CompilerType::Archiver => "Archiver",
            };
            write!(f, "{name}")
        }
    }

    // Custom deserialization function to validate the schema version.
    //
    // The version is written as a plain YAML scalar, which some parsers hand
    // over as a number.
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl Visitor<'_> for SchemaVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a schema version")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(value.to_string())
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(format!("{value:.1}"))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(format!("{value}.0"))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(format!("{value}.0"))
            }
        }

        let schema = deserializer.deserialize_any(SchemaVisitor)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            Err(de::Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {

    use super::types::*;
    use std::collections::HashSet;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Empty string value for field '{field}'")]
        EmptyString { field: String },
        #[error("Duplicate {field} entry at: {idx}")]
        DuplicateEntry { field: &'static str, idx: usize },
        #[error("Conflicting options for '{path}': ignored compiler with type '{compiler_type}'")]
        IgnoredWithType { path: String, compiler_type: CompilerType },
        #[error("Multiple validation errors: {errors:?}")]
        Multiple { errors: Vec<ValidationError> },
    }

    /// Combinator for collecting and handling validation errors
    #[derive(Default)]
    struct ValidationCollector {
        errors: Vec<ValidationError>,
    }

    impl ValidationCollector {
        fn add(&mut self, error: ValidationError) {
            self.errors.push(error);
        }

        fn add_result(&mut self, result: Result<(), ValidationError>) {
            if let Err(error) = result {
                match error {
                    ValidationError::Multiple { errors } => {
                        self.errors.extend(errors);
                    }
                    single_error => self.errors.push(single_error),
                }
            }
        }

        fn finish(mut self) -> Result<(), ValidationError> {
            match self.errors.len() {
                0 => Ok(()),
                1 => Err(self.errors.remove(0)),
                _ => Err(ValidationError::Multiple { errors: self.errors }),
            }
        }
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            for (idx, compiler) in config.compilers.iter().enumerate() {
                collector.add_result(Compiler::validate(compiler).map_err(|error| match error {
                    ValidationError::EmptyString { .. } => ValidationError::EmptyString {
                        field: format!("compilers[{idx}].path"),
                    },
                    other => other,
                }));
            }

            // Check for duplicate compiler paths
            let mut seen_paths = HashSet::new();
            for (idx, compiler) in config.compilers.iter().enumerate() {
                if !seen_paths.insert(&compiler.path) {
                    collector.add(ValidationError::DuplicateEntry { field: "compiler", idx });
                }
            }

            collector.finish()
        }
    }

    impl Validator<Compiler> for Compiler {
        type Error = ValidationError;

        fn validate(config: &Compiler) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            if config.path.as_os_str().is_empty() {
                collector.add(ValidationError::EmptyString { field: "path".to_string() });
            }
            if config.ignore
                && let Some(compiler_type) = config.as_
            {
                collector.add(ValidationError::IgnoredWithType {
                    path: config.path.display().to_string(),
                    compiler_type,
                });
            }

            collector.finish()
        }
    }

}

pub mod loader {
    use super::{Main, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use log::{debug, info};
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "citnames.yml";

    pub struct Loader {}

    impl Loader {
        /// Loads the configuration from the specified file or the default locations.
        ///
        /// If the configuration file is specified, it will be used. Otherwise, the default locations
        /// will be searched for the configuration file. If the configuration file is not found, the
        /// default configuration will be returned.
        pub fn load(current_directory: &Path, filename: Option<&str>) -> Result<Main, ConfigError> {
            if let Some(path) = filename {
                return Self::from_file(Path::new(path));
            }

            for location in Self::file_locations(current_directory) {
                debug!("Checking configuration file: {}", location.display());
                if location.exists() {
                    return Self::from_file(location.as_path());
                }
            }
            debug!("Configuration file not found. Using the default configuration.");
            Ok(Main::default())
        }

        /// The default locations where the configuration file can be found.
        ///
        /// The locations are searched in the following order:
        /// - The current working directory.
        /// - The local configuration directory of the user.
        /// - The configuration directory of the user.
        /// - The local configuration directory of the application.
        /// - The configuration directory of the application.
        fn file_locations(current_directory: &Path) -> Vec<PathBuf> {
            let mut locations = vec![current_directory.to_path_buf()];

            if let Some(base_dirs) = BaseDirs::new() {
                locations.push(base_dirs.config_local_dir().to_path_buf());
                locations.push(base_dirs.config_dir().to_path_buf());
            }
            if let Some(proj_dirs) = ProjectDirs::from("com.github", "rizsotto", "citnames") {
                locations.push(proj_dirs.config_local_dir().to_path_buf());
                locations.push(proj_dirs.config_dir().to_path_buf());
            }
            // filter out duplicate elements from the list
            locations.dedup();
            // append the default configuration file name to the locations
            locations.iter().map(|p| p.join(CONFIG_FILE_NAME)).collect()
        }

        /// Loads the configuration from the specified file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            info!("Loading configuration file: {}", path.display());

            let content = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;

            let config = Self::parse_yaml(&content)
                .map_err(|message| ConfigError::ParseError { path: path.to_path_buf(), message })?;

            Main::validate(&config)
                .map_err(|source| ConfigError::ValidationError { path: path.to_path_buf(), source })?;

            Ok(config)
        }

        /// Define the deserialization format of the config file.
        fn parse_yaml<T>(content: &str) -> Result<T, String>
        where
            T: serde::de::DeserializeOwned,
        {
            serde_saphyr::from_str(content).map_err(|error| error.to_string())
        }
    }

    /// Represents all possible configuration-related errors.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// Error when opening or reading a configuration file.
        #[error("Failed to access configuration file '{path}': {source}")]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        /// Error when parsing the configuration file format.
        #[error("Failed to parse configuration from file '{path}': {message}")]
        ParseError { path: PathBuf, message: String },
        /// Error when configuration validation fails.
        #[error("Configuration validation failed for '{path}': {source}")]
        ValidationError {
            path: PathBuf,
            #[source]
            source: crate::config::validation::ValidationError,
        },
    }

}
