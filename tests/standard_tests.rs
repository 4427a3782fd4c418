mod common;

use common::{count_marks, fixture_files, parse_standard_test, rotations, run_trace, test_data_dir};

#[test]
fn standard_format_tests() {
    let test_dir = test_data_dir().join("standard");
    let mut passed = 0;

    for path in fixture_files(&test_dir, "txt") {
        let test_name = path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let (layout, expected_trace) = match parse_standard_test(&path) {
            Ok(parsed) => parsed,
            Err(e) => panic!("Test '{}' failed to parse: {}", test_name, e),
        };

        // Test all 4 rotations
        let variants = rotations(&layout).into_iter().zip(rotations(&expected_trace));
        for ((variant_name, variant_layout), (_, variant_expected)) in variants {
            let (actual_trace, report) = run_trace(&variant_layout);

            if actual_trace != variant_expected {
                panic!(
                    "Test '{}' [{}] trace mismatch\nexpected:\n{}\nactual:\n{}",
                    test_name, variant_name, variant_expected, actual_trace
                );
            }
            assert_eq!(
                report.visited_cells,
                Some(count_marks(&variant_expected)),
                "Test '{}' [{}] visited count",
                test_name,
                variant_name
            );
        }

        passed += 1;
    }

    assert!(passed > 0, "no standard fixtures found in {}", test_dir.display());
    println!("All {} standard format tests passed", passed);
}

#[test]
fn canonical_fixture_visits_41_cells() {
    let path = test_data_dir().join("standard").join("canonical.txt");
    let (layout, expected_trace) = parse_standard_test(&path).unwrap();

    let (actual_trace, report) = run_trace(&layout);
    assert_eq!(actual_trace, expected_trace);
    assert_eq!(report.visited_cells, Some(41));
}
