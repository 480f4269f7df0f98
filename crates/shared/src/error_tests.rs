use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::NotExist(Resource::AccountProduct), 400)]
#[case(AppError::Exists(Resource::AccountProduct), 400)]
#[case(AppError::InvalidCredentials, 400)]
#[case(AppError::EntityTypeInvalid, 400)]
#[case(AppError::EntityDataInvalid, 400)]
#[case(AppError::EntityPayloadOverloaded, 400)]
#[case(AppError::Validation("page".into()), 400)]
#[case(AppError::Database("boom".into()), 400)]
#[case(AppError::Internal("boom".into()), 400)]
#[case(AppError::Unauthorized("expired".into()), 401)]
fn test_status_codes(#[case] error: AppError, #[case] expected: u16) {
    assert_eq!(error.status_code(), expected);
}

#[rstest]
#[case(AppError::NotExist(Resource::AccountProduct), "account_product_not_exist")]
#[case(AppError::Exists(Resource::AccountProduct), "account_product_exists")]
#[case(AppError::NotExist(Resource::Entity), "entity_not_exist")]
#[case(
    AppError::Exists(Resource::SysUser),
    "sys_user_credential_combination_not_allowed"
)]
#[case(AppError::InvalidCredentials, "invalid_credentials")]
#[case(AppError::Database("boom".into()), "unhandled_exception")]
#[case(AppError::Internal("boom".into()), "unhandled_exception")]
fn test_error_codes(#[case] error: AppError, #[case] expected: &str) {
    assert_eq!(error.error_code(), expected);
}

#[test]
fn test_not_exist_message() {
    assert_eq!(
        AppError::NotExist(Resource::AccountProduct).message(),
        "Account product record does not exist."
    );
}

#[test]
fn test_exists_message() {
    assert_eq!(
        AppError::Exists(Resource::Email).message(),
        "Email record already exists. A duplicate record is not allowed."
    );
}

#[test]
fn test_storage_failures_are_masked() {
    let error = AppError::Database("relation \"sales.em_emails\" does not exist".into());
    assert_eq!(error.message(), UNHANDLED_MESSAGE);
    assert!(error.to_string().contains("em_emails"));
}

#[test]
fn test_entity_payload_messages() {
    assert_eq!(
        AppError::EntityPayloadOverloaded.message(),
        "Entity can only be an individual or non-individual, not both."
    );
    assert_eq!(
        AppError::EntityDataInvalid.message(),
        "Entity data is invalid, a valid payload must be provided."
    );
}

#[test]
fn test_validation_message_is_detail() {
    assert_eq!(
        AppError::Validation("limit must be between 1 and 100".into()).message(),
        "limit must be between 1 and 100"
    );
}
