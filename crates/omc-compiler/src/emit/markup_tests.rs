use super::*;

#[test]
fn wraps_every_index_expression() {
    let src = "void f() { theta[i][j] = 1.0; }";
    let arrays = vec![ArrayInfo { name: "theta".to_string(), dims: vec![3, 4] }];
    let out = run(src, &arrays).unwrap();
    assert!(out.contains("om_check_index(i,3,0,\"theta\",__FILE__,__LINE__)"));
    assert!(out.contains("om_check_index(j,4,1,\"theta\",__FILE__,__LINE__)"));
}

#[test]
fn leaves_unrelated_brackets_untouched() {
    let src = "int other[5];";
    let arrays = vec![ArrayInfo { name: "theta".to_string(), dims: vec![3] }];
    let out = run(src, &arrays).unwrap();
    assert_eq!(out, src);
}

#[test]
fn conflicting_shapes_for_the_same_name_is_an_error() {
    let arrays = vec![
        ArrayInfo { name: "theta".to_string(), dims: vec![3] },
        ArrayInfo { name: "theta".to_string(), dims: vec![4] },
    ];
    assert!(run("", &arrays).is_err());
}
