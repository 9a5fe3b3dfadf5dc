use cli::input::load_profile;

#[test]
fn loads_profile_from_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("profile.json");
    std::fs::write(
        &path,
        r#"{"age": 67, "gender": "Female", "occupation": "Other", "income": "2.5L-5L",
            "location": "Madurai", "casteCategory": "General", "disability": "Yes"}"#,
    )
    .unwrap();
    let profile = load_profile(path.to_str().unwrap()).unwrap();
    assert_eq!(profile.age, "67");
    assert_eq!(profile.income, "2.5L-5L");
}

#[test]
fn missing_key_error_names_the_key() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("profile.json");
    std::fs::write(&path, r#"{"age": "30", "gender": "Male"}"#).unwrap();
    let err = load_profile(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("occupation"), "{err}");
}

#[test]
fn missing_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    assert!(load_profile(path.to_str().unwrap()).is_err());
}
