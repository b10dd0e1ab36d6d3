use scicalc::{
    AngleUnit, CalcError, EngineConfig, EvalError, LexError, Token, calculate, calculate_with,
    format_number, tokenize,
};

fn calc_(s: &str) -> f64 {
    let Ok(value) = calculate(s) else {
        panic!("Failed to evaluate expression: {s}");
    };
    value
}

fn eval_error_(s: &str) -> EvalError {
    match calculate(s) {
        Err(CalcError::Eval(error)) => error,
        other => panic!("Expected an evaluation error for {s}, got {other:?}"),
    }
}

fn is_domain_error(s: &str) -> bool {
    matches!(eval_error_(s), EvalError::DomainError(_))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_standard_arithmetic() {
    assert_close(calc_("2+3*4"), 14.0);
    assert_close(calc_("(2+3)*4"), 20.0);
    assert_close(calc_("1 + 2 - 3 + 4"), 4.0);
    assert_close(calc_("100 / 10 / 5"), 2.0);
    assert_close(calc_("2 * (3 + (4 - 1)) / 3"), 4.0);
    assert_close(calc_(".5 + 1.25"), 1.75);
    assert_close(calc_("0.1 + 0.2"), 0.3);
}

#[test]
fn test_unary_minus_and_power() {
    // Unary minus binds looser than `^`
    assert_close(calc_("-2^2"), -4.0);
    assert_close(calc_("(-2)^2"), 4.0);
    assert_close(calc_("2^3^2"), 512.0);
    assert_close(calc_("-3 * -3"), 9.0);
    assert_close(calc_("pow(2, 3) - 2^3"), 0.0);
}

#[test]
fn test_scientific_functions() {
    assert_close(calc_("sqrt(16)"), 4.0);
    assert_close(calc_("fact(5)"), 120.0);
    assert_close(calc_("fact(0)"), 1.0);
    assert_close(calc_("pow(2,10)"), 1024.0);
    assert_close(calc_("ln(1)"), 0.0);
    assert_close(calc_("log(100)"), 2.0);
    assert_close(calc_("exp(1)"), std::f64::consts::E);
    assert_close(calc_("ln(exp(2))"), 2.0);
    assert_close(calc_("sqrt(fact(4) + 1)"), 5.0);
}

#[test]
fn test_trigonometry_defaults_to_degrees() {
    assert_close(calc_("sin(30)"), 0.5);
    assert_close(calc_("cos(60)"), 0.5);
    assert_close(calc_("tan(45)"), 1.0);
    assert_close(calc_("sin(0)"), 0.0);

    let radians = EngineConfig {
        angle_unit: AngleUnit::Radians,
        ..EngineConfig::default()
    };
    let Ok(value) = calculate_with("sin(pi / 6)", &radians) else {
        panic!("radian evaluation failed");
    };
    assert_close(value, 0.5);
}

#[test]
fn test_tan_at_odd_right_angles_is_finite_overflow_not_error() {
    assert!(calc_("tan(90)").abs() > 1e15);
    assert!(calc_("tan(270)").abs() > 1e15);
}

#[test]
fn test_constants() {
    assert_close(calc_("pi"), std::f64::consts::PI);
    assert_close(calc_("e"), std::f64::consts::E);
    assert_close(calc_("pi + e"), std::f64::consts::PI + std::f64::consts::E);
    assert_close(calc_("2 * pi"), std::f64::consts::TAU);
}

#[test]
fn test_domain_errors() {
    assert!(is_domain_error("sqrt(-1)"));
    assert!(is_domain_error("fact(-1)"));
    assert!(is_domain_error("fact(2.5)"));
    assert!(is_domain_error("log(0)"));
    assert!(is_domain_error("log(-5)"));
    assert!(is_domain_error("ln(0)"));
    assert!(is_domain_error("pow(-8, 1/3)"));
    assert!(is_domain_error("(-8)^0.5"));
    assert!(is_domain_error("fact(exp(1000))"));
    assert!(is_domain_error("fact(-exp(1000))"));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(eval_error_("10/0"), EvalError::DivisionByZero);
    assert_eq!(eval_error_("0/0"), EvalError::DivisionByZero);
    assert_eq!(eval_error_("1/(1-1)"), EvalError::DivisionByZero);
}

#[test]
fn test_overflow_is_not_an_error() {
    assert_eq!(calc_("pow(10, 309)"), f64::INFINITY);
    assert_eq!(calc_("exp(1000)"), f64::INFINITY);
    assert_eq!(calc_("fact(171)"), f64::INFINITY);
    assert!(calc_("fact(170)").is_finite());
}

#[test]
fn test_never_returns_nan() {
    for input in [
        "sqrt(-1)",
        "exp(1000) - exp(1000)",
        "0 * exp(1000)",
        "pow(-1, 0.5)",
    ] {
        if let Ok(value) = calculate(input) {
            panic!("{input} evaluated to {value}");
        }
    }
}

#[test]
fn test_malformed_inputs_have_distinct_stable_kinds() {
    let empty = eval_error_("");
    let open = eval_error_("((");
    let dangling = eval_error_("2+");
    let unknown = eval_error_("foo(1)");

    assert_eq!(empty, EvalError::EmptyExpression);
    assert_eq!(open, EvalError::UnmatchedParen);
    assert_eq!(dangling, EvalError::UnexpectedEnd);
    assert_eq!(unknown, EvalError::UnknownFunction("foo".to_string()));

    let kinds = [&empty, &open, &dangling, &unknown];
    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            assert_ne!(
                std::mem::discriminant(*a),
                std::mem::discriminant(*b),
                "{a:?} and {b:?} share a kind"
            );
        }
    }

    // Stable across calls
    assert_eq!(eval_error_("(("), open);
    assert_eq!(eval_error_("foo(1)"), unknown);
}

#[test]
fn test_other_syntax_errors() {
    assert_eq!(eval_error_("   "), EvalError::EmptyExpression);
    assert_eq!(eval_error_("2 3"), EvalError::TrailingInput);
    assert_eq!(eval_error_("(1+2"), EvalError::UnmatchedParen);
    assert_eq!(eval_error_("1+2)"), EvalError::UnmatchedParen);
    assert_eq!(
        eval_error_("pow(1,2,3)"),
        EvalError::ArityMismatch("pow".to_string())
    );
    assert_eq!(
        eval_error_("sqrt()"),
        EvalError::ArityMismatch("sqrt".to_string())
    );
    assert_eq!(
        eval_error_("x + 1"),
        EvalError::UnknownConstant("x".to_string())
    );
}

#[test]
fn test_lex_errors_short_circuit() {
    assert_eq!(
        calculate("2 & 3"),
        Err(CalcError::Lex(LexError::UnexpectedCharacter(2)))
    );
    assert_eq!(
        calculate("1.2.3 + foo(1)"),
        Err(CalcError::Lex(LexError::MalformedNumber(0)))
    );
    // The lex error wins even though parsing would fail first
    assert_eq!(
        calculate("(( @"),
        Err(CalcError::Lex(LexError::UnexpectedCharacter(3)))
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    for input in ["2+3*4", "sin(30) + fact(6)", "sqrt(-1)", "(("] {
        assert_eq!(calculate(input), calculate(input), "{input}");
    }
}

#[test]
fn test_numeric_literals_round_trip_through_lexer() {
    let input = "3.25 + 0.1 * 12 - 1024 / 0.001 + 123456.789";
    let literals = ["3.25", "0.1", "12", "1024", "0.001", "123456.789"];

    let Ok(tokens) = tokenize(input) else {
        panic!("Failed to tokenize {input}");
    };
    let numbers: Vec<f64> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Number(value) => Some(*value),
            _ => None,
        })
        .collect();

    assert_eq!(numbers.len(), literals.len());
    for (value, literal) in numbers.iter().zip(literals) {
        assert_eq!(literal.parse::<f64>().ok(), Some(*value));
        assert_eq!(format_number(*value), literal);
    }
    assert_eq!(tokens.last(), Some(&Token::End));
}

#[test]
fn test_nesting_depth_guard() {
    let too_deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(eval_error_(&too_deep), EvalError::TooDeeplyNested);

    let calls = format!("{}4{}", "sqrt(".repeat(65), ")".repeat(65));
    assert_eq!(eval_error_(&calls), EvalError::TooDeeplyNested);

    let shallow = EngineConfig {
        max_depth: 2,
        ..EngineConfig::default()
    };
    assert_eq!(calculate_with("((1))", &shallow), Ok(1.0));
    assert_eq!(
        calculate_with("(((1)))", &shallow),
        Err(CalcError::Eval(EvalError::TooDeeplyNested))
    );

    let unbounded = EngineConfig {
        max_depth: usize::MAX,
        ..EngineConfig::default()
    };
    let very_deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert_eq!(
        calculate_with(&very_deep, &unbounded),
        Err(CalcError::Eval(EvalError::TooDeeplyNested))
    );
}

#[test]
fn test_concurrent_evaluation() {
    let inputs = ["2+3*4", "fact(10)", "sqrt(2)", "10/0", "pow(2, 0.5)"];
    let expected: Vec<_> = inputs.iter().map(|input| calculate(input)).collect();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let results: Vec<_> = inputs.iter().map(|input| calculate(input)).collect();
                    assert_eq!(results, expected);
                }
            });
        }
    });
}

#[test]
fn test_formatted_results() {
    assert_eq!(format_number(calc_("fact(5)")), "120");
    assert_eq!(format_number(calc_("1/8")), "0.125");
    assert_eq!(format_number(calc_("-2^2")), "-4");
    assert_eq!(format_number(calc_("fact(20)")), "2432902008176640000");
    assert_eq!(format_number(calc_("pow(10, 400)")), "Infinity");
}
