#[cfg(test)]
mod model_tests {
    use jiff::{civil::date, Timestamp};

    use crate::{
        error::ErrorKind,
        models::{
            document::{file_extension, format_file_size, is_allowed_filename},
            requests::{clearable, clearable_date, validate_duration, validate_percentage},
            Document, Pagination, ProgressStatus, Property, RegularizationStatus, StepProgress,
            StepProgressPatch,
        },
    };

    fn create_test_entry(status: ProgressStatus) -> StepProgress {
        StepProgress {
            id: 10,
            property_id: 1,
            step_id: 2,
            step_name: "Topographic survey".to_string(),
            order_sequence: 1,
            estimated_duration_days: Some(15),
            status,
            start_date: None,
            end_date: None,
            responsible_user_id: None,
            completion_percentage: 0,
            observations: None,
            created_by: Some(1),
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            updated_at: Timestamp::from_second(1641081600).unwrap(), // 2022-01-02 00:00:00 UTC
        }
    }

    fn create_test_property() -> Property {
        Property {
            id: 1,
            municipal_code: Some("MM-001".to_string()),
            registry_number: None,
            address_street: "Rua das Flores".to_string(),
            address_number: Some("120".to_string()),
            address_neighborhood: Some("Centro".to_string()),
            address_city: Some("Mogi Mirim".to_string()),
            address_zipcode: None,
            area_total: Some(250.0),
            area_built: None,
            property_type: None,
            current_use: None,
            current_owner: Some("Maria Souza".to_string()),
            regularization_status: RegularizationStatus::Pending,
            description: None,
            geometry: None,
            polygon_geometry: None,
            created_by: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
            steps: vec![],
        }
    }

    #[test]
    fn test_in_progress_sets_start_date_once() {
        let entry = create_test_entry(ProgressStatus::NotStarted);
        let patch = StepProgressPatch {
            status: Some(ProgressStatus::InProgress),
            ..Default::default()
        };

        let started = patch.apply_to(&entry, date(2024, 3, 1)).unwrap();
        assert_eq!(started.status, ProgressStatus::InProgress);
        assert_eq!(started.start_date, Some(date(2024, 3, 1)));

        // Applying the same transition later keeps the original start date
        let again = patch.apply_to(&started, date(2024, 3, 9)).unwrap();
        assert_eq!(again.start_date, Some(date(2024, 3, 1)));
        assert_eq!(again, started);
    }

    #[test]
    fn test_in_progress_with_explicit_start_date_clear() {
        let entry = create_test_entry(ProgressStatus::NotStarted);
        let patch = StepProgressPatch {
            status: Some(ProgressStatus::InProgress),
            start_date: Some(None),
            ..Default::default()
        };

        let started = patch.apply_to(&entry, date(2024, 3, 15)).unwrap();
        assert_eq!(started.status, ProgressStatus::InProgress);
        assert_eq!(started.start_date, None);

        let dated = StepProgressPatch {
            status: Some(ProgressStatus::InProgress),
            start_date: Some(Some(date(2024, 3, 4))),
            ..Default::default()
        };
        let started = dated.apply_to(&entry, date(2024, 3, 15)).unwrap();
        assert_eq!(started.start_date, Some(date(2024, 3, 4)));
    }

    #[test]
    fn test_completed_forces_full_percentage_and_end_date() {
        let mut entry = create_test_entry(ProgressStatus::InProgress);
        entry.start_date = Some(date(2024, 3, 1));
        entry.completion_percentage = 60;

        let patch = StepProgressPatch {
            status: Some(ProgressStatus::Completed),
            completion_percentage: Some(80),
            ..Default::default()
        };
        let done = patch.apply_to(&entry, date(2024, 3, 20)).unwrap();

        assert_eq!(done.completion_percentage, 100);
        assert_eq!(done.end_date, Some(date(2024, 3, 20)));
        assert_eq!(done.start_date, Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_explicit_end_date_wins_over_today() {
        let mut entry = create_test_entry(ProgressStatus::InProgress);
        entry.start_date = Some(date(2024, 3, 1));

        let patch = StepProgressPatch {
            status: Some(ProgressStatus::Completed),
            end_date: Some(Some(date(2024, 3, 5))),
            ..Default::default()
        };
        let done = patch.apply_to(&entry, date(2024, 4, 1)).unwrap();

        assert_eq!(done.end_date, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let mut entry = create_test_entry(ProgressStatus::InProgress);
        entry.start_date = Some(date(2024, 3, 10));
        let original = entry.clone();

        let patch = StepProgressPatch {
            end_date: Some(Some(date(2024, 3, 1))),
            ..Default::default()
        };
        let err = patch.apply_to(&entry, date(2024, 3, 12)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(entry, original);
    }

    #[test]
    fn test_completion_with_future_start_is_rejected() {
        // Completing today while the start date lies in the future
        let mut entry = create_test_entry(ProgressStatus::InProgress);
        entry.start_date = Some(date(2024, 5, 1));

        let patch = StepProgressPatch {
            status: Some(ProgressStatus::Completed),
            ..Default::default()
        };
        let err = patch.apply_to(&entry, date(2024, 4, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_clearing_fields() {
        let mut entry = create_test_entry(ProgressStatus::Blocked);
        entry.start_date = Some(date(2024, 1, 1));
        entry.responsible_user_id = Some(7);
        entry.observations = Some("Waiting on the notary".to_string());

        let patch = StepProgressPatch {
            start_date: Some(None),
            responsible_user_id: Some(None),
            observations: Some(None),
            ..Default::default()
        };
        let cleared = patch.apply_to(&entry, date(2024, 2, 1)).unwrap();

        assert_eq!(cleared.start_date, None);
        assert_eq!(cleared.responsible_user_id, None);
        assert_eq!(cleared.observations, None);
        assert_eq!(cleared.status, ProgressStatus::Blocked);
    }

    #[test]
    fn test_percentage_only_patch_on_completed_entry() {
        let mut entry = create_test_entry(ProgressStatus::Completed);
        entry.completion_percentage = 100;

        let patch = StepProgressPatch {
            completion_percentage: Some(90),
            ..Default::default()
        };
        let updated = patch.apply_to(&entry, date(2024, 2, 1)).unwrap();
        assert_eq!(updated.completion_percentage, 90);
        assert_eq!(updated.status, ProgressStatus::Completed);
    }

    #[test]
    fn test_empty_patch() {
        assert!(StepProgressPatch::default().is_empty());
        assert!(!StepProgressPatch {
            observations: Some(None),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_duration_days() {
        let mut entry = create_test_entry(ProgressStatus::Completed);
        assert_eq!(entry.duration_days(), None);

        entry.start_date = Some(date(2024, 1, 30));
        entry.end_date = Some(date(2024, 3, 1));
        assert_eq!(entry.duration_days(), Some(31));
    }

    #[test]
    fn test_full_address() {
        let mut property = create_test_property();
        assert_eq!(
            property.full_address(),
            "Rua das Flores, 120, Centro, Mogi Mirim"
        );

        property.address_number = None;
        property.address_neighborhood = Some(String::new());
        assert_eq!(property.full_address(), "Rua das Flores, Mogi Mirim");
    }

    #[test]
    fn test_property_serialization_skips_empty_geometry() {
        let property = create_test_property();
        let json = serde_json::to_value(&property).unwrap();

        assert!(json.get("geometry").is_none());
        assert!(json.get("steps").is_none());
        assert_eq!(json["regularization_status"], "pending");
    }

    #[test]
    fn test_document_helpers() {
        let document = Document {
            id: 1,
            step_progress_id: 10,
            filename: "Planta.PDF".to_string(),
            file_path: "storage/10/planta.pdf".to_string(),
            file_size: Some(1536),
            file_type: Some("application/pdf".to_string()),
            document_type: Some("plan".to_string()),
            description: None,
            uploaded_by: Some(2),
            created_at: Timestamp::from_second(1640995200).unwrap(),
        };

        assert_eq!(document.extension(), ".pdf");
        assert!(document.is_pdf());
        assert!(!document.is_image());
        assert_eq!(document.formatted_size().as_deref(), Some("1.5 KB"));
    }

    #[test]
    fn test_file_name_rules() {
        assert_eq!(file_extension("photo.JPeg"), ".jpeg");
        assert_eq!(file_extension("README"), "");
        assert!(is_allowed_filename("deed.docx"));
        assert!(!is_allowed_filename("script.sh"));
        assert!(!is_allowed_filename("no_extension"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0.0 B");
        assert_eq!(format_file_size(1023), "1023.0 B");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_pagination() {
        assert_eq!(Pagination::from_page(Some(3), None), None);
        assert_eq!(
            Pagination::from_page(None, Some(20)),
            Some(Pagination {
                limit: 20,
                offset: 0
            })
        );
        assert_eq!(
            Pagination::from_page(Some(3), Some(20)),
            Some(Pagination {
                limit: 20,
                offset: 40
            })
        );
        assert_eq!(
            Pagination::from_page(Some(0), Some(10)).map(|p| p.offset),
            Some(0)
        );
    }

    #[test]
    fn test_input_helpers() {
        assert_eq!(clearable(None), None);
        assert_eq!(clearable(Some("  ".to_string())), Some(None));
        assert_eq!(
            clearable(Some(" note ".to_string())),
            Some(Some("note".to_string()))
        );

        assert_eq!(clearable_date("end_date", Some("")).unwrap(), Some(None));
        assert_eq!(
            clearable_date("end_date", Some("2024-02-29")).unwrap(),
            Some(Some(date(2024, 2, 29)))
        );
        assert!(clearable_date("end_date", Some("2023-02-29")).is_err());
        assert!(clearable_date("end_date", Some("29/02/2024")).is_err());

        assert_eq!(validate_percentage(100).unwrap(), 100);
        assert!(validate_percentage(101).is_err());
        assert!(validate_percentage(-1).is_err());
        assert_eq!(validate_duration(0).unwrap(), 0);
        assert!(validate_duration(-3).is_err());
    }

    #[test]
    fn test_status_parsing() {
        for status in ProgressStatus::ALL {
            assert_eq!(status.as_str().parse::<ProgressStatus>(), Ok(status));
        }
        for status in RegularizationStatus::ALL {
            assert_eq!(status.as_str().parse::<RegularizationStatus>(), Ok(status));
        }
        assert!("done".parse::<ProgressStatus>().is_err());
    }
}
