//! Build script for sam-constraints
//!
//! With the `reference` feature enabled this compiles the CasADi-generated C
//! source of the terminal constraint so tests can compare against it.
//!
//! The generated file is looked up in `SAM_CODEGEN_DIR` (default:
//! `generated/` next to this crate), either directly or inside the
//! `SAM_equation_system_constraints/` subdirectory acados creates.

fn main() {
    println!("cargo:rustc-check-cfg=cfg(sam_reference_linked)");

    #[cfg(feature = "reference")]
    build_reference();
}

#[cfg(feature = "reference")]
const FUNCTION: &str = "SAM_equation_system_constr_h_e_fun_jac_uxt_zt";

#[cfg(feature = "reference")]
const RENAMED: &str = "sam_reference_h_e_fun_jac_uxt_zt";

/// Exported symbol suffixes of a CasADi function
#[cfg(feature = "reference")]
const SUFFIXES: [&str; 17] = [
    "",
    "_alloc_mem",
    "_init_mem",
    "_free_mem",
    "_checkout",
    "_release",
    "_incref",
    "_decref",
    "_n_in",
    "_n_out",
    "_default_in",
    "_name_in",
    "_name_out",
    "_sparsity_in",
    "_sparsity_out",
    "_work",
    "_work_bytes",
];

#[cfg(feature = "reference")]
fn build_reference() {
    use std::env;
    use std::path::PathBuf;

    println!("cargo:rerun-if-env-changed=SAM_CODEGEN_DIR");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let codegen_dir = env::var("SAM_CODEGEN_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| manifest_dir.join("generated"));

    let file_name = format!("{FUNCTION}.c");
    let candidates = [
        codegen_dir.join(&file_name),
        codegen_dir.join("SAM_equation_system_constraints").join(&file_name),
    ];

    let Some(source) = candidates.iter().find(|path| path.exists()) else {
        println!("cargo:warning=Generated constraint source not found in {:?}", codegen_dir);
        println!("cargo:warning=Set SAM_CODEGEN_DIR to the acados c_generated_code directory");
        println!("cargo:warning=Skipping reference compilation");
        return;
    };

    println!("cargo:rerun-if-changed={}", source.display());

    let mut build = cc::Build::new();
    build.file(source).warnings(false);

    // Keep the generated symbols apart from the ones this crate exports
    for suffix in SUFFIXES {
        build.define(&format!("{FUNCTION}{suffix}"), Some(format!("{RENAMED}{suffix}").as_str()));
    }

    build.compile("sam_reference");
    println!("cargo:rustc-link-lib=m");
    println!("cargo:rustc-cfg=sam_reference_linked");
}
