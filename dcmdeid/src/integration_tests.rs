#[cfg(test)]
mod tests {
  use std::path::Path;

  use dcmdeid_anonymize::*;
  use dcmdeid_batch::*;
  use dcmdeid_core::*;
  use dcmdeid_json::*;

  const JOHN_DOE: &str = r#"{
    "00080020": { "vr": "DA", "Value": ["20240102"] },
    "00080050": { "vr": "SH", "Value": ["ABC123"] },
    "00080060": { "vr": "CS", "Value": ["CT"] },
    "00080080": { "vr": "LO", "Value": ["General Hospital"] },
    "00081110": {
      "vr": "SQ",
      "Value": [{
        "00080090": { "vr": "PN", "Value": [{ "Alphabetic": "Smith^Jane" }] },
        "00081150": { "vr": "UI", "Value": ["1.2.840.10008.3.1.2.3.1"] }
      }]
    },
    "00090010": { "vr": "LO", "Value": ["ACME"] },
    "00091001": { "vr": "LO", "Value": ["secret"] },
    "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^John" }] },
    "00100020": { "vr": "LO", "Value": ["MRN-001"] },
    "00100030": { "vr": "DA", "Value": ["19800315"] },
    "00100040": { "vr": "CS", "Value": ["M"] },
    "00101002": {
      "vr": "SQ",
      "Value": [{ "00100020": { "vr": "LO", "Value": ["OLD-7"] } }]
    },
    "00280010": { "vr": "US", "Value": [512] },
    "7FE00010": { "vr": "OW", "InlineBinary": "AAECAw==" }
  }"#;

  const JANE_ROE: &str = r#"{
    "00080050": { "vr": "SH", "Value": ["XYZ789"] },
    "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Roe^Jane" }] },
    "00100020": { "vr": "LO", "Value": ["MRN-002"] },
    "00100040": { "vr": "CS", "Value": ["F"] }
  }"#;

  const OVERRIDES: &str = "PatientID,Update_PatientName,Update_PatientID,\
    Update_InstitutionName,Update_PatientBirthDate,Update_AccessionNumber\n\
    MRN-001,Anon^001,SUBJ-001,Site A,19700101,123\n";

  fn read_output(path: &Path) -> DataSet {
    DataSet::from_json(&std::fs::read_to_string(path).unwrap()).unwrap()
  }

  #[test]
  fn batch_integration_test() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("study");
    std::fs::create_dir_all(root.join("series1")).unwrap();

    std::fs::write(root.join("series1/1.json"), JOHN_DOE).unwrap();
    std::fs::write(root.join("series1/2.JSON"), JOHN_DOE).unwrap();
    std::fs::write(root.join("jane.json"), JANE_ROE).unwrap();
    std::fs::write(root.join("notes.txt"), "not a record").unwrap();

    let config = DeidConfig::default().resolve().unwrap();
    let codec = JsonRecordCodec::default();

    // Scan and extract
    let paths = scan_directory(&root, &config.extension).unwrap();
    assert_eq!(paths.len(), 3);

    let extracted = extract_metadata(
      &codec,
      &root,
      &paths,
      &config.template_fields,
      &config.key_fields,
    );
    assert!(extracted.failures.is_empty());
    assert_eq!(
      extracted.rows[1].primary_key,
      "Doe^John_MRN-001_ABC123".to_string()
    );

    // Build the template and export it
    let mut template = build_template(
      &extracted.rows,
      &config.template_fields,
      &config.update_fields,
    );
    assert_eq!(template.len(), 2);

    let mut exported = vec![];
    template.write_csv(&mut exported).unwrap();
    let exported = OverrideTable::from_csv(exported.as_slice()).unwrap();
    assert_eq!(exported.headers(), template.column_names().as_slice());
    assert_eq!(
      exported.column_values("Update_AccessionNumber"),
      Some(vec!["789", "123"])
    );

    // Merge the operator's overrides
    let outcome = template
      .merge_overrides(
        &OverrideTable::from_csv(OVERRIDES.as_bytes()).unwrap(),
        &config.join_column,
        &config.update_column_names(),
      )
      .unwrap();
    assert_eq!(outcome.unmatched, vec!["MRN-002".to_string()]);
    assert!(outcome.incomplete_rows.is_empty());

    // De-identify
    let report = AnonymizationDriver::new(&codec, &config.tag_policy)
      .with_remove_private_tags(config.remove_private_tags)
      .run(&extracted.rows, &template, &|_: &MetadataRow| ());
    assert!(report.failures.is_empty());
    assert_eq!(report.written.len(), 3);

    let output_root = dir.path().join("study-Anonymized");

    for name in ["series1/1.json", "series1/2.JSON"] {
      let data_set = read_output(&output_root.join(name));

      assert_eq!(
        data_set.get_string(dictionary::PATIENT_NAME.tag),
        Ok("Anon^001")
      );
      assert_eq!(
        data_set.get_string(dictionary::PATIENT_ID.tag),
        Ok("SUBJ-001")
      );
      assert_eq!(
        data_set.get_string(dictionary::INSTITUTION_NAME.tag),
        Ok("Site A")
      );
      assert_eq!(
        data_set.get_string(dictionary::PATIENT_BIRTH_DATE.tag),
        Ok("19700101")
      );
      assert_eq!(
        data_set.get_string(dictionary::ACCESSION_NUMBER.tag),
        Ok("123")
      );
      assert_eq!(data_set.get_string(dictionary::PATIENT_SEX.tag), Ok(""));
      assert_eq!(data_set.get_string(dictionary::STUDY_DATE.tag), Ok(""));
      assert_eq!(data_set.get_string(dictionary::MODALITY.tag), Ok("CT"));
      assert_eq!(
        data_set.get_value(dictionary::ROWS.tag).unwrap().get_ints(),
        Ok(vec![512])
      );
      assert!(data_set.has(dictionary::PIXEL_DATA.tag));

      // Private data elements are removed
      assert!(data_set.tags().iter().all(|tag| !tag.is_private()));

      // Nested data elements are resolved too
      let other_patient_ids = data_set
        .get_value(dictionary::OTHER_PATIENT_IDS_SEQUENCE.tag)
        .unwrap()
        .sequence_items()
        .unwrap();
      assert_eq!(
        other_patient_ids[0].get_string(dictionary::PATIENT_ID.tag),
        Ok("SUBJ-001")
      );

      let referenced_study = data_set
        .get_value(dictionary::REFERENCED_STUDY_SEQUENCE.tag)
        .unwrap()
        .sequence_items()
        .unwrap();
      assert_eq!(
        referenced_study[0]
          .get_string(dictionary::REFERRING_PHYSICIAN_NAME.tag),
        Ok("")
      );
      assert_eq!(
        referenced_study[0]
          .get_string(dictionary::REFERENCED_SOP_CLASS_UID.tag),
        Ok("1.2.840.10008.3.1.2.3.1")
      );
    }

    // Jane wasn't in the override table so gets the template's defaults
    let jane = read_output(&output_root.join("jane.json"));
    assert_eq!(jane.get_string(dictionary::PATIENT_NAME.tag), Ok(""));
    assert_eq!(jane.get_string(dictionary::PATIENT_ID.tag), Ok(""));
    assert_eq!(jane.get_string(dictionary::ACCESSION_NUMBER.tag), Ok("789"));
    assert!(!jane.has(dictionary::INSTITUTION_NAME.tag));

    // The input files are untouched
    assert_eq!(
      std::fs::read_to_string(root.join("jane.json")).unwrap(),
      JANE_ROE
    );
  }

  #[test]
  fn tag_policy_precedence_test() {
    let mut data_set = DataSet::new();
    for (tag, vr, value) in [
      (dictionary::PATIENT_NAME.tag, ValueRepresentation::PersonName, "A"),
      (dictionary::PATIENT_ID.tag, ValueRepresentation::LongString, "B"),
      (dictionary::STATION_NAME.tag, ValueRepresentation::ShortString, "C"),
      (dictionary::STUDY_ID.tag, ValueRepresentation::ShortString, "D"),
    ] {
      data_set.insert_string_value(tag, vr, value).unwrap();
    }

    let policy = TagPolicy::new()
      .with_spare_tags([dictionary::PATIENT_NAME.tag])
      .with_mask_vrs([
        ValueRepresentation::PersonName,
        ValueRepresentation::ShortString,
      ])
      .with_mask_value("MASKED")
      .with_clear_tags([dictionary::STUDY_ID.tag, dictionary::PATIENT_ID.tag])
      .with_overrides([(dictionary::PATIENT_ID.tag, "SUBJ".to_string())]);

    data_set.apply_tag_policy(&policy).unwrap();

    assert_eq!(data_set.get_string(dictionary::PATIENT_NAME.tag), Ok("A"));
    assert_eq!(data_set.get_string(dictionary::PATIENT_ID.tag), Ok("SUBJ"));
    assert_eq!(
      data_set.get_string(dictionary::STATION_NAME.tag),
      Ok("MASKED")
    );
    assert_eq!(data_set.get_string(dictionary::STUDY_ID.tag), Ok(""));
  }
}
