//! Strided multiply kernel shared by matrix–matrix and matrix–vector products.
//!
//! Operands are described by explicit row/column strides, so the same loop
//! serves row-major matrices, column vectors (`n == 1`) and transposed views.

use num_traits::Num;

/// `c = a * b`, with `a: (m, k)`, `b: (k, n)`, `c: (m, n)`.
///
/// `c` is overwritten.
#[allow(clippy::too_many_arguments)]
#[inline]
pub(crate) fn gemm<T: Copy + Num>(
    m: usize,
    n: usize,
    k: usize,
    a: &[T],
    rsa: usize,
    csa: usize,
    b: &[T],
    rsb: usize,
    csb: usize,
    c: &mut [T],
    rsc: usize,
    csc: usize,
) {
    debug_assert!(m == 0 || n == 0 || (m - 1) * rsc + (n - 1) * csc < c.len());
    debug_assert!(m == 0 || k == 0 || (m - 1) * rsa + (k - 1) * csa < a.len());
    debug_assert!(k == 0 || n == 0 || (k - 1) * rsb + (n - 1) * csb < b.len());

    for i in 0..m {
        for j in 0..n {
            let mut acc = T::zero();
            let a0 = i * rsa;
            let b0 = j * csb;

            for p in 0..k {
                acc = acc + a[a0 + p * csa] * b[p * rsb + b0];
            }

            c[i * rsc + j * csc] = acc;
        }
    }
}
