use shop::errors::ErrorCode;

#[test]
fn error_code_has_correct_status() {
    assert_eq!(ErrorCode::shop_user_not_found_v1.status(), 404);
    assert_eq!(ErrorCode::shop_out_of_stock_v1.status(), 400);
    assert_eq!(ErrorCode::shop_insufficient_balance_v1.status(), 400);
    assert_eq!(ErrorCode::shop_internal_persistence_v1.status(), 500);
}

#[test]
fn error_code_to_problem_works() {
    let problem = ErrorCode::shop_package_not_found_v1.to_problem("Package not found");

    assert_eq!(problem.status, 404);
    assert_eq!(problem.title, "Package Not Found");
    assert_eq!(problem.code, "shop.package.not_found.v1");
    assert_eq!(problem.detail, "Package not found");
    assert_eq!(
        problem.type_url,
        "https://errors.slc.local/shop.package.not_found.v1"
    );
}

#[test]
fn all_error_codes_are_distinct_and_valid() {
    let mut codes = std::collections::HashSet::new();
    for code in ErrorCode::ALL {
        let def = code.def();
        assert!((100..=599).contains(&def.status), "Invalid status: {}", def.status);
        assert!(def.type_url.ends_with(def.code));
        assert!(codes.insert(def.code), "duplicate code {}", def.code);
    }
}
