// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage area / 2D flow area fields

use super::{FieldId, FieldSpec, NameHeaderField, PointListField, ScalarField};
use crate::feature::Feature;
use crate::points::{PointLayout, PointList};
use crate::value::{Decoration, NameHeader};

/// Meanings of `Storage Area Is2D=`
pub const IS_2D_CODES: &[(i64, &str)] = &[(0, "storage area"), (1, "2D flow area")];

static HEADER: NameHeaderField = NameHeaderField {
    id: FieldId::StorageAreaHeader,
};
static SURFACE_LINE: PointListField = PointListField {
    id: FieldId::SurfaceLine,
    label: "Storage Area Surface Line=",
    decoration: Decoration::lead(" "),
    layout: PointLayout::grouped(16, 1),
};
static STORAGE_TYPE: ScalarField =
    ScalarField::integer(FieldId::StorageType, "Storage Area Type=", Decoration::lead(" "));
static AREA: ScalarField = ScalarField::text(FieldId::Area, "Storage Area Area=", Decoration::NONE);
static MIN_ELEVATION: ScalarField =
    ScalarField::text(FieldId::MinElevation, "Storage Area Min Elev=", Decoration::NONE);
static IS_2D: ScalarField =
    ScalarField::code(FieldId::Is2D, "Storage Area Is2D=", Decoration::NONE, IS_2D_CODES);
static POINT_GENERATION: ScalarField = ScalarField::text(
    FieldId::PointGenerationData,
    "Storage Area Point Generation Data=",
    Decoration::NONE,
);
static POINTS_2D: PointListField = PointListField {
    id: FieldId::Points2D,
    label: "Storage Area 2D Points=",
    decoration: Decoration::lead(" "),
    layout: PointLayout::grouped(16, 2),
};
static PERIMETER_TIME: ScalarField = ScalarField::text(
    FieldId::PerimeterTime,
    "Storage Area 2D PointsPerimeterTime=",
    Decoration::NONE,
);
static MANNINGS: ScalarField =
    ScalarField::text(FieldId::Mannings, "Storage Area Mannings=", Decoration::NONE);
static CELL_VOLUME_FILTER: ScalarField = ScalarField::text(
    FieldId::CellVolumeFilterTolerance,
    "2D Cell Volume Filter Tolerance=",
    Decoration::NONE,
);
static CELL_MIN_AREA_FRACTION: ScalarField = ScalarField::text(
    FieldId::CellMinAreaFraction,
    "2D Cell Minimum Area Fraction=",
    Decoration::NONE,
);
static FACE_PROFILE_FILTER: ScalarField = ScalarField::text(
    FieldId::FaceProfileFilterTolerance,
    "2D Face Profile Filter Tolerance=",
    Decoration::NONE,
);
static FACE_AREA_ELEVATION_PROFILE_FILTER: ScalarField = ScalarField::text(
    FieldId::FaceAreaElevationProfileFilterTolerance,
    "2D Face Area Elevation Profile Filter Tolerance=",
    Decoration::NONE,
);
static FACE_AREA_ELEVATION_CONVEYANCE_RATIO: ScalarField = ScalarField::text(
    FieldId::FaceAreaElevationConveyanceRatio,
    "2D Face Area Elevation Conveyance Ratio=",
    Decoration::NONE,
);
static FACE_MIN_LENGTH_RATIO: ScalarField = ScalarField::text(
    FieldId::FaceMinLengthRatio,
    "2D Face Min Length Ratio=",
    Decoration::NONE,
);

/// Storage area catalog; the header comes first
pub static STORAGE_AREA_FIELDS: [&dyn FieldSpec; 16] = [
    &HEADER,
    &SURFACE_LINE,
    &STORAGE_TYPE,
    &AREA,
    &MIN_ELEVATION,
    &IS_2D,
    &POINT_GENERATION,
    &POINTS_2D,
    &PERIMETER_TIME,
    &MANNINGS,
    &CELL_VOLUME_FILTER,
    &CELL_MIN_AREA_FRACTION,
    &FACE_PROFILE_FILTER,
    &FACE_AREA_ELEVATION_PROFILE_FILTER,
    &FACE_AREA_ELEVATION_CONVEYANCE_RATIO,
    &FACE_MIN_LENGTH_RATIO,
];

/// Read-only typed view of a storage area feature
#[derive(Debug, Clone, Copy)]
pub struct StorageArea<'a> {
    feature: &'a Feature,
}

impl<'a> StorageArea<'a> {
    pub(crate) fn new(feature: &'a Feature) -> Self {
        Self { feature }
    }

    #[inline]
    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    fn header(&self) -> Option<&'a NameHeader> {
        self.feature.field(FieldId::StorageAreaHeader)?.as_name()
    }

    fn text(&self, id: FieldId) -> Option<&'a str> {
        self.feature.field(id)?.as_text()
    }

    pub fn name(&self) -> &'a str {
        self.header().map(|h| h.name.as_str()).unwrap_or("")
    }

    /// Second header column, empty when absent
    pub fn description(&self) -> &'a str {
        self.header()
            .and_then(|h| h.rest.as_deref())
            .and_then(|rest| rest.split(',').next())
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn surface_line(&self) -> Option<&'a PointList> {
        self.feature.field(FieldId::SurfaceLine)?.as_points()
    }

    pub fn points_2d(&self) -> Option<&'a PointList> {
        self.feature.field(FieldId::Points2D)?.as_points()
    }

    pub fn storage_type(&self) -> Option<i64> {
        self.feature.field(FieldId::StorageType)?.as_integer()
    }

    pub fn is_2d(&self) -> Option<bool> {
        self.feature
            .field(FieldId::Is2D)?
            .as_code()
            .map(|c| c.code != 0)
    }

    pub fn area(&self) -> Option<&'a str> {
        self.text(FieldId::Area)
    }

    pub fn min_elevation(&self) -> Option<&'a str> {
        self.text(FieldId::MinElevation)
    }

    pub fn point_generation_data(&self) -> Option<&'a str> {
        self.text(FieldId::PointGenerationData)
    }

    pub fn perimeter_time(&self) -> Option<&'a str> {
        self.text(FieldId::PerimeterTime)
    }

    pub fn mannings(&self) -> Option<&'a str> {
        self.text(FieldId::Mannings)
    }

    /// Any of the `2D ...` tolerance fields
    pub fn tolerance(&self, id: FieldId) -> Option<&'a str> {
        match id {
            FieldId::CellVolumeFilterTolerance
            | FieldId::CellMinAreaFraction
            | FieldId::FaceProfileFilterTolerance
            | FieldId::FaceAreaElevationProfileFilterTolerance
            | FieldId::FaceAreaElevationConveyanceRatio
            | FieldId::FaceMinLengthRatio => self.text(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_and_labels_are_unique() {
        let ids: HashSet<_> = STORAGE_AREA_FIELDS.iter().map(|s| s.id()).collect();
        let labels: HashSet<_> = STORAGE_AREA_FIELDS.iter().map(|s| s.label()).collect();
        assert_eq!(ids.len(), STORAGE_AREA_FIELDS.len());
        assert_eq!(labels.len(), STORAGE_AREA_FIELDS.len());
        assert_eq!(STORAGE_AREA_FIELDS[0].id(), FieldId::StorageAreaHeader);
    }

    #[test]
    fn test_each_line_is_claimed_by_one_spec() {
        let lines = [
            "Storage Area=Pond,,",
            "Storage Area Surface Line= 3",
            "Storage Area Type= 0",
            "Storage Area 2D Points= 4",
            "Storage Area 2D PointsPerimeterTime=",
            "2D Face Area Elevation Profile Filter Tolerance=0.003",
            "2D Face Profile Filter Tolerance=0.003",
        ];
        for line in lines {
            let claims = STORAGE_AREA_FIELDS.iter().filter(|s| s.matches(line)).count();
            assert_eq!(claims, 1, "{}", line);
        }
    }
}
