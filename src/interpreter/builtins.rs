/*!
Built-in functions: `log`, `log2`, `log10`, `ln`, `sin`, `cos`, `tan`,
`abs`, `sqrt`, plus `print` from the REPL/script surface. All of the math
built-ins require a dimensionless scalar (or one reached by formula-less,
unit-less conversion) and preserve `sig_figs` from their argument.
*/

use crate::decimal::Decimal;
use crate::error::{CLError, CLResult, ErrorKind};
use crate::quantity::Quantity;
use crate::value::Value;

/// Names recognized as built-ins; used by the interpreter's call dispatch
/// to decide whether an identifier refers to a built-in or a user `work`.
pub fn is_builtin(name: &str) -> bool {
    matches!(name, "print" | "log" | "log2" | "log10" | "ln" | "sin" | "cos" | "tan" | "abs" | "sqrt")
}

pub fn call(name: &str, args: &[Value], span: crate::error::Span) -> CLResult<Value> {
    if name == "print" {
        let arg = args.first().ok_or_else(|| CLError::at(ErrorKind::ArityError { expected: 1, found: 0 }, span))?;
        println!("{arg}");
        return Ok(arg.clone());
    }

    let arity_err = || CLError::at(ErrorKind::ArityError { expected: 1, found: args.len() }, span);
    let q = match args {
        [Value::Quantity(q)] => q,
        [_] => return Err(CLError::at(ErrorKind::TypeError(format!("`{name}` requires a dimensionless quantity argument")), span)),
        _ => return Err(arity_err()),
    };
    if !q.is_dimensionless_scalar() {
        return Err(CLError::at(ErrorKind::TypeError(format!("`{name}` requires a dimensionless, formula-less quantity")), span));
    }

    let magnitude = match name {
        // `log` is base 2 by default, matching every worked example in the
        // README/demo scripts.
        "log" | "log2" => Decimal::log2(q.magnitude.magnitude),
        "log10" => Decimal::log10(q.magnitude.magnitude),
        "ln" => Decimal::ln(q.magnitude.magnitude),
        "sin" => Ok(Decimal::sin(q.magnitude.magnitude)),
        "cos" => Ok(Decimal::cos(q.magnitude.magnitude)),
        "tan" => Ok(Decimal::tan(q.magnitude.magnitude)),
        "abs" => Ok(q.magnitude.magnitude.abs()),
        "sqrt" => Decimal::sqrt(q.magnitude.magnitude),
        other => return Err(CLError::at(ErrorKind::UnknownIdentifier(other.to_string()), span)),
    }
    .map_err(|e| e.with_span(span))?;

    Ok(Value::Quantity(Quantity::scalar(Decimal {
        magnitude,
        sig_figs: q.magnitude.sig_figs,
        decimals: magnitude.scale(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    fn scalar(n: &str) -> Value {
        Value::Quantity(Quantity::scalar(Decimal::from_literal(n).unwrap()))
    }

    #[test]
    fn log_defaults_to_base_2() {
        let result = call("log", &[scalar("8")], Span::default()).unwrap();
        match result {
            Value::Quantity(q) => assert_eq!(q.magnitude.magnitude.round_dp(4), rust_decimal::Decimal::from(3)),
            other => panic!("expected a quantity, got {other:?}"),
        }
    }

    #[test]
    fn abs_preserves_sig_figs() {
        let result = call("abs", &[scalar("-3.40")], Span::default()).unwrap();
        match result {
            Value::Quantity(q) => assert_eq!(q.magnitude.sig_figs, crate::decimal::SigFigs::Finite(3)),
            other => panic!("expected a quantity, got {other:?}"),
        }
    }

    #[test]
    fn non_scalar_argument_is_a_type_error() {
        let m = crate::unit::registry::resolve("m").unwrap();
        let q = Quantity { magnitude: Decimal::from_literal("1.0").unwrap(), unit: m, formula: None, is_bool: false };
        assert!(call("sqrt", &[Value::Quantity(q)], Span::default()).is_err());
    }
}
