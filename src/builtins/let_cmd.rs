use crate::builtins::registry::CommandInfo;
use crate::engine::Shell;
use crate::strings::substring;

pub const COMMAND_INFO: CommandInfo = CommandInfo { name: "let", run: let_runner };

/// `let VAR=A op B` with `op ∈ {+,-,*,/,%}`. Signed 64-bit arithmetic;
/// division truncates toward zero and remainder takes the dividend's sign.
/// The result lands in the environment.
pub fn let_runner(args: &[String], _shell: &mut Shell) -> i32 {
    let Some(expression) = args.first() else {
        eprintln!("conch: let: expression expected");
        return 1;
    };
    match evaluate(expression) {
        Ok((variable, result)) => {
            unsafe { std::env::set_var(variable, result.to_string()) };
            0
        }
        Err(message) => {
            eprintln!("conch: let: {message}");
            1
        }
    }
}

fn evaluate(expression: &str) -> Result<(String, i64), String> {
    let (variable, a, operator, b) = parse_expression(expression)?;
    let result = match operator {
        '+' => a.wrapping_add(b),
        '-' => a.wrapping_sub(b),
        '*' => a.wrapping_mul(b),
        '/' | '%' if b == 0 => return Err("division by zero".to_string()),
        '/' => a / b,
        '%' => a % b,
        _ => return Err("expression expected".to_string()),
    };
    Ok((variable, result))
}

/// Split `VAR=A op B` into its pieces. The operator is the first arithmetic
/// symbol past the head of the expression, so a leading sign on the first
/// operand survives (`X=-3+4`).
fn parse_expression(expression: &str) -> Result<(String, i64, char, i64), String> {
    let equals = expression.find('=').ok_or("expression expected")?;
    let variable =
        substring(expression, 0, equals).filter(|v| !v.is_empty()).ok_or("expression expected")?;

    let body = &expression[equals + 1..];
    let (operator_index, operator) = body
        .char_indices()
        .skip(1)
        .find(|(_, ch)| matches!(ch, '+' | '-' | '*' | '/' | '%'))
        .ok_or("expression expected")?;

    let a = body[..operator_index]
        .trim()
        .parse::<i64>()
        .map_err(|_| "expression expected".to_string())?;
    let b = body[operator_index + 1..]
        .trim()
        .parse::<i64>()
        .map_err(|_| "expression expected".to_string())?;

    Ok((variable, a, operator, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_assigns_the_product() {
        assert_eq!(evaluate("X=3*4").unwrap(), ("X".to_string(), 12));
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(evaluate("Q=-7/2").unwrap().1, -3);
        assert_eq!(evaluate("Q=7/2").unwrap().1, 3);
    }

    #[test]
    fn remainder_takes_the_dividend_sign() {
        assert_eq!(evaluate("R=-7%2").unwrap().1, -1);
        assert_eq!(evaluate("R=7%-2").unwrap().1, 1);
    }

    #[test]
    fn leading_sign_belongs_to_the_first_operand() {
        assert_eq!(evaluate("S=-3+4").unwrap().1, 1);
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(evaluate("Z=1/0").unwrap_err(), "division by zero");
        assert_eq!(evaluate("Z=1%0").unwrap_err(), "division by zero");
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        assert!(evaluate("noequals").is_err());
        assert!(evaluate("X=12").is_err());
        assert!(evaluate("X=a+b").is_err());
        assert!(evaluate("=1+2").is_err());
    }

    #[test]
    fn runner_sets_the_environment() {
        let mut shell = Shell::new();
        let args = vec!["CONCH_LET_TEST=3*4".to_string()];
        assert_eq!(let_runner(&args, &mut shell), 0);
        assert_eq!(std::env::var("CONCH_LET_TEST").as_deref(), Ok("12"));
        unsafe { std::env::remove_var("CONCH_LET_TEST") };
    }
}
