use super::*;

#[test]
fn rad_converts_degrees() {
    assert_eq!(rad(180.0), std::f64::consts::PI);
    assert_eq!(rad(90.0), std::f64::consts::PI / 2.0);
    assert_eq!(rad(450.0), rad(90.0));
}

#[test]
fn parses_simple_translate() {
    let cmds = parse_transform_string("t10,20").unwrap();
    assert_eq!(cmds, vec![TransformCommand::Translate { dx: 10.0, dy: 20.0 }]);
}

#[test]
fn parses_multiple_commands_in_order() {
    let cmds = parse_transform_string("r0,150,150s0.5,0.5,150,150").unwrap();
    assert_eq!(
        cmds,
        vec![
            TransformCommand::Rotate {
                angle: 0.0,
                cx: 150.0,
                cy: 150.0
            },
            TransformCommand::Scale {
                sx: 0.5,
                sy: 0.5,
                cx: 150.0,
                cy: 150.0
            },
        ]
    );
    assert_eq!(commands_to_string(&cmds), "r0,150,150s0.5,0.5,150,150");
}

#[test]
fn tolerates_spaces_and_commas() {
    let a = parse_transform_string("t 10 , 20 s 2 , 2").unwrap();
    let b = parse_transform_string("t10 20,s2,2").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[test]
fn compact_defaults_fill_missing_arguments() {
    let cmds = parse_transform_string("t5r30s2m2,0").unwrap();
    assert_eq!(
        cmds,
        vec![
            TransformCommand::Translate { dx: 5.0, dy: 0.0 },
            TransformCommand::Rotate {
                angle: 30.0,
                cx: 0.0,
                cy: 0.0
            },
            TransformCommand::Scale {
                sx: 2.0,
                sy: 2.0,
                cx: 0.0,
                cy: 0.0
            },
            TransformCommand::Matrix([2.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
        ]
    );
}

#[test]
fn zero_scale_stays_zero() {
    let m = transform_to_matrix("s0").unwrap();
    assert_eq!(m.to_string(), "matrix(0,0,0,0,0,0)");
}

#[test]
fn negative_and_exponent_numbers() {
    let cmds = parse_transform_string("t-1.5e1,.5").unwrap();
    assert_eq!(cmds, vec![TransformCommand::Translate { dx: -15.0, dy: 0.5 }]);
}

#[test]
fn compact_rejects_garbage() {
    assert!(matches!(
        parse_transform_string("x10"),
        Err(MenuError::Parse(_))
    ));
    assert!(matches!(
        parse_transform_string("10,20"),
        Err(MenuError::Parse(_))
    ));
    assert!(matches!(parse_transform_string("t"), Err(MenuError::Parse(_))));
}

#[test]
fn standard_notation_maps_to_commands() {
    let cmds = svg_transform_to_commands("translate(10,20) rotate(45)").unwrap();
    assert_eq!(
        cmds,
        vec![
            TransformCommand::Translate { dx: 10.0, dy: 20.0 },
            TransformCommand::Rotate {
                angle: 45.0,
                cx: 0.0,
                cy: 0.0
            },
        ]
    );

    let cmds = svg_transform_to_commands("scale(3)").unwrap();
    assert_eq!(
        cmds,
        vec![TransformCommand::Scale {
            sx: 3.0,
            sy: 3.0,
            cx: 0.0,
            cy: 0.0
        }]
    );
}

#[test]
fn skew_x_becomes_matrix_command() {
    let cmds = svg_transform_to_commands("skewX(30)").unwrap();
    assert_eq!(cmds.len(), 1);
    let TransformCommand::Matrix([a, b, c, d, e, f]) = cmds[0] else {
        panic!("expected a matrix command, got {:?}", cmds[0]);
    };
    assert_eq!((a, b, d, e, f), (1.0, 0.0, 1.0, 0.0, 0.0));
    assert!((c - rad(30.0).tan()).abs() < 1e-12);

    let cmds = svg_transform_to_commands("skewY(30)").unwrap();
    let TransformCommand::Matrix(m) = cmds[0] else {
        panic!("expected a matrix command");
    };
    assert!((m[1] - rad(30.0).tan()).abs() < 1e-12);
    assert_eq!(m[2], 0.0);
}

#[test]
fn standard_notation_rejects_unknown_functions() {
    assert!(matches!(
        svg_transform_to_commands("perspective(10)"),
        Err(MenuError::Parse(_))
    ));
    assert!(matches!(
        svg_transform_to_commands("matrix(1,0,0)"),
        Err(MenuError::Parse(_))
    ));
}

#[test]
fn transform_to_matrix_accepts_both_notations() {
    assert_eq!(
        transform_to_matrix("t10,20").unwrap().to_string(),
        "matrix(1,0,0,1,10,20)"
    );
    assert_eq!(
        transform_to_matrix("translate(10 20)").unwrap().to_string(),
        "matrix(1,0,0,1,10,20)"
    );
    assert_eq!(transform_to_matrix("").unwrap(), Matrix::identity());
}

#[test]
fn rotate_about_point_via_string() {
    let m = transform_to_matrix("r90,150,150").unwrap();
    assert!(m.a.abs() < 1e-6);
    assert!((m.b - 1.0).abs() < 1e-6);
    assert!((m.c + 1.0).abs() < 1e-6);
    assert!(m.d.abs() < 1e-6);
    assert_eq!(m.apply_x(150.0, 150.0), 150.0);
}

#[test]
fn fold_matches_manual_composition() {
    let m = transform_to_matrix("r0,150,150s0.5,0.5,150,150").unwrap();
    let mut expected = Matrix::identity();
    expected
        .rotate(0.0, 150.0, 150.0)
        .scale(0.5, 0.5, Some((150.0, 150.0)));
    assert_eq!(m, expected);
    assert_eq!(m.to_string(), "matrix(0.5,0,0,0.5,75,75)");
}
