// Copyright (c) 2024-2026 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

// extern crate we're testing, same as any other code would do.
extern crate wgs84_intercept;

use angle_sc::{is_within_tolerance, Degrees};
use csv::ReaderBuilder;
use std::env;
use std::path::Path;
use unit_sphere::LatLong;
use wgs84_intercept::*;

/// A row of data/intercept_cases.csv: name, position, line origin,
/// line destination and whether the intercept is defined.
type InterceptCase = (String, f64, f64, f64, f64, f64, f64, bool);

#[test]
fn test_intercept_cases() {
    let file_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/intercept_cases.csv");
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(file_path)
        .expect("Could not read file: intercept_cases.csv");

    let mut count = 0;
    for result in csv_reader.deserialize::<InterceptCase>() {
        let (name, lon, lat, lon1, lat1, lon2, lat2, defined) = result.unwrap();
        let point = Coordinate::new(Degrees(lon), Degrees(lat));
        let origin = Coordinate::new(Degrees(lon1), Degrees(lat1));
        let destination = Coordinate::new(Degrees(lon2), Degrees(lat2));
        let line = Line::new(origin, destination);

        let b = intercept(&point, &line);
        assert_eq!(!defined, b.is_nan(), "{name}: {b:?}");
        assert_eq!(b.to_bits(), intercept(&point, &line).to_bits(), "{name}");

        let distance = distance_to_line(&point, &line);
        if defined {
            assert_eq!(distance, distance_to_point(&point, &b), "{name}");

            // The intercept is no further away than the end points
            assert!(distance.0 <= distance_to_point(&point, &origin).0 + 1e-6, "{name}");
            assert!(distance.0 <= distance_to_point(&point, &destination).0 + 1e-6, "{name}");

            // The direction of the line does not matter
            let reversed = intercept(&point, &Line::new(destination, origin));
            assert!(is_within_tolerance(b.lon().0, reversed.lon().0, 1e-9), "{name}");
            assert!(is_within_tolerance(b.lat().0, reversed.lat().0, 1e-9), "{name}");
        } else {
            assert!(distance.0.is_nan(), "{name}");
            assert!(try_intercept(&point, &line).is_err(), "{name}");
        }

        count += 1;
    }
    assert_eq!(5, count);
}

#[test]
fn test_reykjavik_istanbul_washington() {
    let reykjavik = Coordinate::new(Degrees(-21.8524424), Degrees(64.132442));
    let istanbul = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
    let washington = Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488));
    let line = Line::new(istanbul, washington);

    let b = try_intercept(&reykjavik, &line).unwrap();
    assert!(is_within_tolerance(-21.983148259557282, b.lon().0, 1e-9));
    assert!(is_within_tolerance(54.38603968291745, b.lat().0, 1e-9));

    let distance = distance_to_line(&reykjavik, &line);
    assert!(is_within_tolerance(1_085_757.971_366_864_4, distance.0, 1e-3));

    // The intercept is on the geodesic between Istanbul and Washington:
    // the bearing from Istanbul to the intercept is the initial bearing
    assert!(is_within_tolerance(
        initial_bearing(&istanbul, &washington).0,
        initial_bearing(&istanbul, &b).0,
        1e-6
    ));
}

#[test]
fn test_distance_symmetry() {
    let positions = [
        Coordinate::new(Degrees(-21.8524424), Degrees(64.132442)),
        Coordinate::new(Degrees(29.0121795), Degrees(41.0053215)),
        Coordinate::new(Degrees(-77.0145665), Degrees(38.8993488)),
        Coordinate::new(Degrees(139.6917), Degrees(35.6895)),
        Coordinate::new(Degrees(0.0), Degrees(-90.0)),
    ];
    for a in &positions {
        assert_eq!(0.0, distance_to_point(a, a).0);
        for b in &positions {
            assert!(is_within_tolerance(
                distance_to_point(a, b).0,
                distance_to_point(b, a).0,
                1e-6
            ));
        }
    }
}

#[test]
fn test_destination_bearing_round_trip() {
    let origin = Coordinate::new(Degrees(29.0121795), Degrees(41.0053215));
    for azimuth in [-170.0, -90.0, -10.0, 10.0, 90.0, 170.0] {
        for distance in [1.0, 1_000.0, 100_000.0, 5_000_000.0] {
            let destination = destination_point(&origin, Degrees(azimuth), Metres(distance));
            assert!(is_within_tolerance(
                azimuth,
                initial_bearing(&origin, &destination).0,
                1e-6
            ));
            assert!(is_within_tolerance(
                distance,
                distance_to_point(&origin, &destination).0,
                1e-6
            ));
        }
    }
}

#[test]
#[ignore]
fn test_geodesic_examples() {
    // Read GEODTEST_DIR/GeodTest.dat file and run tests
    let geoid = Ellipsoid::wgs84();

    let filename = "GeodTest.dat";
    let dir_key = "GEODTEST_DIR";

    let p = env::var(dir_key).expect("Environment variable not found: GEODTEST_DIR");
    let path = Path::new(&p);
    let file_path = path.join(filename);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_path(file_path)
        .expect("Could not read file: GeodTest.dat");

    //  random: lines 1 to 100000
    //  antipodal: lines 100001 to 150000
    //  short: lines 150001 to 200000
    for (index, result) in csv_reader.records().enumerate() {
        let line_number = index + 1;
        if 200_000 < line_number {
            break;
        }

        let record = result.unwrap();
        let lat1 = Degrees(record[0].parse::<f64>().unwrap());
        let lon1 = Degrees(record[1].parse::<f64>().unwrap());
        let azi1 = Degrees(record[2].parse::<f64>().unwrap());
        let lat2 = Degrees(record[3].parse::<f64>().unwrap());
        let lon2 = Degrees(record[4].parse::<f64>().unwrap());
        let d_metres = Metres(record[6].parse::<f64>().unwrap());
        let d_degrees = Degrees(record[7].parse::<f64>().unwrap());
        let m12 = Metres(record[8].parse::<f64>().unwrap());

        let a = LatLong::new(lat1, lon1);
        let b = LatLong::new(lat2, lon2);
        let result = geodesic::calculate_inverse(&a, &b, &geoid);

        let delta_azimuth = libm::fabs(azi1.0 - Degrees::from(result.azimuth1()).0);
        assert!(
            delta_azimuth <= 5.5e-5,
            "azimuth, line: {line_number} delta: {delta_azimuth} azimuth: {azi1:?}"
        );

        let delta_length = libm::fabs(d_degrees.0.to_radians() - result.arc_length().0);
        assert!(
            delta_length <= 2.0e-11,
            "arc length, line: {line_number} delta: {delta_length} length: {d_degrees:?}"
        );

        let delta_length_m = libm::fabs(d_metres.0 - result.distance().0);
        if line_number <= 150_000 {
            let ratio = delta_length_m / d_metres.0;
            assert!(
                ratio <= 1.7e-11,
                "length, line: {line_number} ratio: {ratio} length: {d_metres:?}"
            );
        } else {
            assert!(
                delta_length_m <= 9.0e-5,
                "length, line: {line_number} delta: {delta_length_m} length: {d_metres:?}"
            );
        }

        let delta_m12 = libm::fabs(m12.0 - result.reduced_length().0);
        assert!(
            delta_m12 <= 1.0e-4,
            "reduced length, line: {line_number} delta: {delta_m12} m12: {m12:?}"
        );
    }
}
