//! Optimal-Ate pairing on BN256.
//!
//! The Miller loop walks the NAF of 6u+2 with the twist point kept in
//! Jacobian form, then adds π(Q) and -π²(Q). Line values are sparse Fp12
//! elements `a + c·v + b·w²` multiplied in directly.

use super::curve;
use super::ecp::G1Point;
use super::ecp2::{G2Point, TwistPoint};
use super::fp::Fp;
use super::fp12::Fp12;
use super::fp2::Fp2;
use super::fp4::Fp4;
use super::gt::Gt;

/// Coefficients of one line evaluation.
struct Line {
    a: Fp2,
    b: Fp2,
    c: Fp2,
}

/// Add the affine point `pp` to `r` and evaluate the line through them at
/// (px, py). `r2` is pp.y².
fn line_add(r: &TwistPoint, pp: &TwistPoint, px: &Fp, py: &Fp, r2: &Fp2) -> (TwistPoint, Line) {
    let b = pp.x * r.t;
    let d = ((pp.y + r.z).square() - *r2 - r.t) * r.t;
    let h = b - r.x;
    let i = h.square();
    let e = i.double().double();
    let j = h * e;
    let l1 = d - r.y.double();
    let v = r.x * e;

    let x = l1.square() - j - v.double();
    let z = (r.z + h).square() - r.t - i;
    let y = l1 * (v - x) - (r.y * j).double();
    let t = z.square();

    let t2 = (pp.y + z).square() - *r2 - t;
    let line = Line {
        a: (l1 * pp.x).double() - t2,
        b: -(l1.mul_fp(px).double()),
        c: z.mul_fp(py).double(),
    };
    (TwistPoint { x, y, z, t }, line)
}

/// Double `r` and evaluate the tangent line at (px, py).
fn line_double(r: &TwistPoint, px: &Fp, py: &Fp) -> (TwistPoint, Line) {
    let a = r.x.square();
    let b = r.y.square();
    let c = b.square();
    let d = ((r.x + b).square() - a - c).double();
    let e = a.triple();
    let g = e.square();

    let x = g - d.double();
    let z = (r.y + r.z).square() - b - r.t;
    let y = (d - x) * e - c.double().double().double();
    let t = z.square();

    let line = Line {
        a: (r.x + e).square() - a - g - b.double().double(),
        b: -((e * r.t).double().mul_fp(px)),
        c: (z * r.t).double().mul_fp(py),
    };
    (TwistPoint { x, y, z, t }, line)
}

/// f · (a + c·v + b·w²)
fn mul_line(f: &Fp12, line: &Line) -> Fp12 {
    let l = Fp4::new(line.a, line.c);
    Fp12::new(
        f.c0 * l + f.c1.mul_fp2(&line.b).mul_v(),
        f.c1 * l + f.c2.mul_fp2(&line.b).mul_v(),
        f.c2 * l + f.c0.mul_fp2(&line.b),
    )
}

fn miller(q: &G2Point, p: &G1Point) -> Fp12 {
    let (qx, qy) = q.to_affine();
    let (px, py) = p.to_affine();

    let q_aff = TwistPoint::from_affine(qx, qy);
    let minus_q = TwistPoint::from_affine(qx, -qy);
    let r2 = qy.square();

    let mut f = Fp12::ONE;
    let mut r = q_aff;
    let naf = &curve::SIX_U_PLUS_2_NAF;
    let top = naf.len() - 1;

    for i in (1..=top).rev() {
        let (nr, line) = line_double(&r, &px, &py);
        if i != top {
            f = f.square();
        }
        f = mul_line(&f, &line);
        r = nr;

        let addend = match naf[i - 1] {
            1 => &q_aff,
            -1 => &minus_q,
            _ => continue,
        };
        let (nr, line) = line_add(&r, addend, &px, &py, &r2);
        f = mul_line(&f, &line);
        r = nr;
    }

    // T + π(Q), then T - π²(Q); frobenius_p2 already returns -π²(Q).
    for image in [q_aff.frobenius(), q_aff.frobenius_p2()] {
        let (x, y) = image.to_affine();
        let pp = TwistPoint::from_affine(x, y);
        let (nr, line) = line_add(&r, &pp, &px, &py, &y.square());
        f = mul_line(&f, &line);
        r = nr;
    }
    f
}

/// f^((p¹²-1)/N): the easy part (p⁶-1)(p²+1), then the hard part as a
/// fixed combination of f^u, f^u², f^u³ and Frobenius images.
pub(crate) fn final_exponentiation(f: &Fp12) -> Fp12 {
    let mut t1 = f.frobenius_p6() * f.invert();
    t1 = t1 * t1.frobenius_p2();

    let fp = t1.frobenius();
    let fp2 = t1.frobenius_p2();
    let fp3 = fp2.frobenius();

    let fu = t1.pow_u();
    let fu2 = fu.pow_u();
    let fu3 = fu2.pow_u();

    let y0 = fp * fp2 * fp3;
    let y1 = t1.frobenius_p6();
    let y2 = fu2.frobenius_p2();
    let y3 = fu.frobenius().frobenius_p6();
    let y4 = (fu * fu2.frobenius()).frobenius_p6();
    let y5 = fu2.frobenius_p6();
    let y6 = (fu3 * fu3.frobenius()).frobenius_p6();

    let mut t0 = y6.cyclo6_square() * y4 * y5;
    let mut t1 = y3 * y5 * t0;
    t0 = t0 * y2;
    t1 = (t1.cyclo6_square() * t0).cyclo6_square();
    t0 = t1 * y1;
    t1 = t1 * y0;
    t0.cyclo6_square() * t1
}

/// e(P, Q). Returns the identity of GT when either input is the identity.
pub fn pair(p: &G1Point, q: &G2Point) -> Gt {
    if p.is_identity() || q.is_identity() {
        return Gt::identity();
    }
    Gt::from_fp12(final_exponentiation(&miller(q, p)))
}
