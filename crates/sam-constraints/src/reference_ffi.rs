//! Raw bindings to the CasADi-generated C implementation
//!
//! Compiled by `build.rs` when the `reference` feature is enabled and the
//! generated source is found. Its symbols are renamed with a
//! `sam_reference_` prefix so both implementations can be linked together.

#![allow(dead_code)]

use std::os::raw::{c_char, c_double, c_int};
use std::ptr;

use crate::sparsity::CasadiInt;
use crate::terminal::{NH, NNZ_JAC, NX};

extern "C" {
    pub fn sam_reference_h_e_fun_jac_uxt_zt(
        arg: *const *const c_double,
        res: *mut *mut c_double,
        iw: *mut CasadiInt,
        w: *mut c_double,
        mem: c_int,
    ) -> c_int;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_n_in() -> CasadiInt;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_n_out() -> CasadiInt;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_name_in(i: CasadiInt) -> *const c_char;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_name_out(i: CasadiInt) -> *const c_char;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_sparsity_in(i: CasadiInt) -> *const CasadiInt;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_sparsity_out(i: CasadiInt) -> *const CasadiInt;
    pub fn sam_reference_h_e_fun_jac_uxt_zt_work(
        sz_arg: *mut CasadiInt,
        sz_res: *mut CasadiInt,
        sz_iw: *mut CasadiInt,
        sz_w: *mut CasadiInt,
    ) -> c_int;
}

/// Evaluate the generated function with the work buffers it asks for
pub fn reference_eval(state: &[f64; NX]) -> ([f64; NH], [f64; NNZ_JAC]) {
    let (mut sz_arg, mut sz_res, mut sz_iw, mut sz_w) = (0, 0, 0, 0);
    let mut residual = [0.0; NH];
    let mut jacobian = [0.0; NNZ_JAC];

    unsafe {
        sam_reference_h_e_fun_jac_uxt_zt_work(&mut sz_arg, &mut sz_res, &mut sz_iw, &mut sz_w);

        let mut arg: Vec<*const c_double> = vec![ptr::null(); sz_arg as usize];
        let mut res: Vec<*mut c_double> = vec![ptr::null_mut(); sz_res as usize];
        let mut iw: Vec<CasadiInt> = vec![0; sz_iw as usize];
        let mut w: Vec<c_double> = vec![0.0; sz_w as usize];

        arg[0] = state.as_ptr();
        res[0] = residual.as_mut_ptr();
        res[1] = jacobian.as_mut_ptr();

        sam_reference_h_e_fun_jac_uxt_zt(arg.as_ptr(), res.as_mut_ptr(), iw.as_mut_ptr(), w.as_mut_ptr(), 0);
    }

    (residual, jacobian)
}
