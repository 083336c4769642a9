//! C calling convention exports
//!
//! acados loads the terminal constraint through the symbols CasADi generates
//! for `SAM_equation_system_constr_h_e_fun_jac_uxt_zt`. Linking this crate as
//! a static library in place of the generated C file provides the same
//! symbols with the same behavior:
//!
//! - the evaluation always returns 0
//! - a null `arg[0]` is read as the zero state, a null `res[k]` skips output k
//! - memory management is a no-op, there is no per-call state
//! - out-of-range slot queries return a null pointer

#![allow(non_snake_case)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_double, c_int};
use std::ptr;

use crate::function::ExternalFunction;
use crate::sparsity::CasadiInt;
use crate::terminal::{TerminalPoseConstraint, NH, NNZ_JAC, NX};

static CONSTRAINT: TerminalPoseConstraint = TerminalPoseConstraint::nominal();

static INPUT_NAMES: [&CStr; 4] = [c"i0", c"i1", c"i2", c"i3"];
static OUTPUT_NAMES: [&CStr; 3] = [c"o0", c"o1", c"o2"];

/// Evaluate residual and transposed Jacobian
///
/// # Safety
///
/// `arg` must point to at least one input pointer; `arg[0]` is null or points
/// to 19 readable doubles. `res` is null or points to at least two output
/// pointers; `res[0]` is null or points to 6 writable doubles, `res[1]` is
/// null or points to 18 writable doubles, and the two do not overlap. `iw`,
/// `w` and `mem` are not used.
#[no_mangle]
pub unsafe extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt(
    arg: *const *const c_double,
    res: *mut *mut c_double,
    _iw: *mut CasadiInt,
    _w: *mut c_double,
    _mem: c_int,
) -> c_int {
    let mut state = [0.0; NX];
    let x = if arg.is_null() { ptr::null() } else { *arg };
    if !x.is_null() {
        state.copy_from_slice(std::slice::from_raw_parts(x, NX));
    }

    let residual = output::<NH>(res, 0);
    let jacobian = output::<NNZ_JAC>(res, 1);
    CONSTRAINT.eval(&state, residual, jacobian);

    0
}

/// Output buffer `k` of `res`, `None` if either pointer is null
unsafe fn output<'a, const N: usize>(res: *mut *mut c_double, k: usize) -> Option<&'a mut [f64; N]> {
    if res.is_null() {
        return None;
    }
    (*res.add(k)).cast::<[f64; N]>().as_mut()
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_alloc_mem() -> c_int {
    0
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_init_mem(_mem: c_int) -> c_int {
    0
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_free_mem(_mem: c_int) {}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_checkout() -> c_int {
    0
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_release(_mem: c_int) {}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_incref() {}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_decref() {}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_n_in() -> CasadiInt {
    CONSTRAINT.n_in() as CasadiInt
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_n_out() -> CasadiInt {
    CONSTRAINT.n_out() as CasadiInt
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_default_in(i: CasadiInt) -> c_double {
    slot(i).map_or(0.0, |i| CONSTRAINT.default_in(i))
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_name_in(i: CasadiInt) -> *const c_char {
    slot(i)
        .and_then(|i| INPUT_NAMES.get(i))
        .map_or(ptr::null(), |name| name.as_ptr())
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_name_out(i: CasadiInt) -> *const c_char {
    slot(i)
        .and_then(|i| OUTPUT_NAMES.get(i))
        .map_or(ptr::null(), |name| name.as_ptr())
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_sparsity_in(i: CasadiInt) -> *const CasadiInt {
    slot(i)
        .and_then(|i| CONSTRAINT.sparsity_in(i))
        .map_or(ptr::null(), |sp| sp.as_ptr())
}

#[no_mangle]
pub extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_sparsity_out(i: CasadiInt) -> *const CasadiInt {
    slot(i)
        .and_then(|i| CONSTRAINT.sparsity_out(i))
        .map_or(ptr::null(), |sp| sp.as_ptr())
}

/// Work vector sizes in elements; null pointers are skipped
///
/// # Safety
///
/// Each pointer is null or valid for writing one `CasadiInt`.
#[no_mangle]
pub unsafe extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_work(
    sz_arg: *mut CasadiInt,
    sz_res: *mut CasadiInt,
    sz_iw: *mut CasadiInt,
    sz_w: *mut CasadiInt,
) -> c_int {
    let work = CONSTRAINT.work_size();
    write_size(sz_arg, work.arg);
    write_size(sz_res, work.res);
    write_size(sz_iw, work.iw);
    write_size(sz_w, work.w);
    0
}

/// Work vector sizes in bytes; null pointers are skipped
///
/// # Safety
///
/// Each pointer is null or valid for writing one `CasadiInt`.
#[no_mangle]
pub unsafe extern "C" fn SAM_equation_system_constr_h_e_fun_jac_uxt_zt_work_bytes(
    sz_arg: *mut CasadiInt,
    sz_res: *mut CasadiInt,
    sz_iw: *mut CasadiInt,
    sz_w: *mut CasadiInt,
) -> c_int {
    let work = CONSTRAINT.work_size().bytes();
    write_size(sz_arg, work.arg);
    write_size(sz_res, work.res);
    write_size(sz_iw, work.iw);
    write_size(sz_w, work.w);
    0
}

fn slot(i: CasadiInt) -> Option<usize> {
    usize::try_from(i).ok()
}

unsafe fn write_size(dst: *mut CasadiInt, value: usize) {
    if let Some(dst) = dst.as_mut() {
        *dst = value as CasadiInt;
    }
}
