// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lateral weir fields

use super::{BlockField, FieldId, FieldSpec, PointListField, ScalarField, StationHeaderField};
use crate::block::{DESCRIPTION_BEGIN, DESCRIPTION_END};
use crate::feature::{Feature, Reach};
use crate::points::{PointLayout, PointList};
use crate::value::{CodedValue, Decoration, StationHeader};

/// Node type carried by a lateral weir's structure header
pub const LATERAL_WEIR_NODE_TYPE: i64 = 6;

/// Meanings of `Lateral Weir Flap Gates=`
pub const FLAP_GATE_CODES: &[(i64, &str)] = &[(0, "none"), (-1, "flap gates")];

static HEADER: StationHeaderField = StationHeaderField {
    id: FieldId::WeirHeader,
    node_type: LATERAL_WEIR_NODE_TYPE,
};
static DESCRIPTION: BlockField = BlockField {
    id: FieldId::Description,
    begin: DESCRIPTION_BEGIN,
    end: DESCRIPTION_END,
};
static NODE_NAME: ScalarField =
    ScalarField::text(FieldId::NodeName, "Node Name=", Decoration::NONE);
static LAST_EDITED: ScalarField =
    ScalarField::text(FieldId::NodeLastEditedTime, "Node Last Edited Time=", Decoration::NONE);
static POSITION: ScalarField =
    ScalarField::text(FieldId::Position, "Lateral Weir Pos=", Decoration::trail(" "));
static END: ScalarField = ScalarField::text(FieldId::End, "Lateral Weir End=", Decoration::NONE);
static DISTANCE: ScalarField =
    ScalarField::text(FieldId::Distance, "Lateral Weir Distance=", Decoration::NONE);
static TW_MULTIPLE_XS: ScalarField = ScalarField::text(
    FieldId::TailwaterMultipleXs,
    "Lateral Weir TW Multiple XS=",
    Decoration::NONE,
);
static WIDTH: ScalarField = ScalarField::text(FieldId::Width, "Lateral Weir WD=", Decoration::NONE);
static COEFFICIENT: ScalarField =
    ScalarField::text(FieldId::Coefficient, "Lateral Weir Coef=", Decoration::NONE);
static OVERFLOW_METHOD: ScalarField =
    ScalarField::text(FieldId::OverflowMethod2D, "LW OverFlow Method 2D=", Decoration::NONE);
static OVERFLOW_VELOCITY: ScalarField = ScalarField::text(
    FieldId::OverflowUseVelocity2D,
    "LW OverFlow Use Velocity Into 2D=",
    Decoration::NONE,
);
static WS_CRITERIA: ScalarField =
    ScalarField::text(FieldId::WsCriteria, "Lateral Weir WSCriteria=", Decoration::trail(" "));
static FLAP_GATES: ScalarField = ScalarField::code(
    FieldId::FlapGates,
    "Lateral Weir Flap Gates=",
    Decoration::trail(" "),
    FLAP_GATE_CODES,
);
static HAGERS_EQUATION: ScalarField =
    ScalarField::text(FieldId::HagersEquation, "Lateral Weir Hagers EQN=", Decoration::lead(" "));
static SIDE_SLOPES: ScalarField =
    ScalarField::text(FieldId::SideSlopes, "Lateral Weir SS=", Decoration::NONE);
static STATION_ELEVATION: PointListField = PointListField {
    id: FieldId::StationElevation,
    label: "Lateral Weir SE=",
    decoration: Decoration::trail(" "),
    layout: PointLayout::stream(8, 10),
};
static WEIR_TYPE: ScalarField =
    ScalarField::integer(FieldId::WeirType, "Lateral Weir Type=", Decoration::trail(" "));
static CONNECTION: ScalarField = ScalarField::text(
    FieldId::ConnectionPosDist,
    "Lateral Weir Connection Pos and Dist=",
    Decoration::NONE,
);
static DIVISION_RATING_CURVE: ScalarField =
    ScalarField::text(FieldId::DivisionRatingCurve, "LW Div RC=", Decoration::NONE);
static CENTERLINE: PointListField = PointListField {
    id: FieldId::Centerline,
    label: "Lateral Weir Centerline=",
    decoration: Decoration::NONE,
    layout: PointLayout::grouped(16, 2),
};

/// Lateral weir catalog; the header comes first
pub static LATERAL_WEIR_FIELDS: [&dyn FieldSpec; 21] = [
    &HEADER,
    &DESCRIPTION,
    &NODE_NAME,
    &LAST_EDITED,
    &POSITION,
    &END,
    &DISTANCE,
    &TW_MULTIPLE_XS,
    &WIDTH,
    &COEFFICIENT,
    &OVERFLOW_METHOD,
    &OVERFLOW_VELOCITY,
    &WS_CRITERIA,
    &FLAP_GATES,
    &HAGERS_EQUATION,
    &SIDE_SLOPES,
    &STATION_ELEVATION,
    &WEIR_TYPE,
    &CONNECTION,
    &DIVISION_RATING_CURVE,
    &CENTERLINE,
];

/// Read-only typed view of a lateral weir feature
#[derive(Debug, Clone, Copy)]
pub struct LateralWeir<'a> {
    feature: &'a Feature,
}

impl<'a> LateralWeir<'a> {
    pub(crate) fn new(feature: &'a Feature) -> Self {
        Self { feature }
    }

    #[inline]
    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    fn text(&self, id: FieldId) -> Option<&'a str> {
        self.feature.field(id)?.as_text()
    }

    pub fn header(&self) -> Option<&'a StationHeader> {
        self.feature.field(FieldId::WeirHeader)?.as_station()
    }

    /// River station as written in the header
    pub fn station(&self) -> &'a str {
        self.header().map(|h| h.station.as_str()).unwrap_or("")
    }

    /// River/reach in effect where the weir appeared
    pub fn reach(&self) -> Option<&'a Reach> {
        self.feature.reach()
    }

    pub fn river_name(&self) -> Option<&'a str> {
        self.reach().map(|r| r.river.as_str())
    }

    pub fn reach_name(&self) -> Option<&'a str> {
        self.reach().map(|r| r.reach.as_str())
    }

    /// Description block joined with newlines
    pub fn description(&self) -> Option<String> {
        self.feature.field(FieldId::Description)?.as_block().map(|b| b.text())
    }

    pub fn node_name(&self) -> Option<&'a str> {
        self.text(FieldId::NodeName)
    }

    pub fn last_edited(&self) -> Option<&'a str> {
        self.text(FieldId::NodeLastEditedTime)
    }

    pub fn position(&self) -> Option<&'a str> {
        self.text(FieldId::Position)
    }

    pub fn distance(&self) -> Option<&'a str> {
        self.text(FieldId::Distance)
    }

    pub fn width(&self) -> Option<&'a str> {
        self.text(FieldId::Width)
    }

    pub fn coefficient(&self) -> Option<&'a str> {
        self.text(FieldId::Coefficient)
    }

    pub fn flap_gates(&self) -> Option<&'a CodedValue> {
        self.feature.field(FieldId::FlapGates)?.as_code()
    }

    pub fn weir_type(&self) -> Option<i64> {
        self.feature.field(FieldId::WeirType)?.as_integer()
    }

    pub fn station_elevation(&self) -> Option<&'a PointList> {
        self.feature.field(FieldId::StationElevation)?.as_points()
    }

    pub fn centerline(&self) -> Option<&'a PointList> {
        self.feature.field(FieldId::Centerline)?.as_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_and_labels_are_unique() {
        let ids: HashSet<_> = LATERAL_WEIR_FIELDS.iter().map(|s| s.id()).collect();
        let labels: HashSet<_> = LATERAL_WEIR_FIELDS.iter().map(|s| s.label()).collect();
        assert_eq!(ids.len(), LATERAL_WEIR_FIELDS.len());
        assert_eq!(labels.len(), LATERAL_WEIR_FIELDS.len());
        assert_eq!(LATERAL_WEIR_FIELDS[0].id(), FieldId::WeirHeader);
    }

    #[test]
    fn test_header_requires_node_type_six() {
        assert!(HEADER.matches("Type RM Length L Ch R = 6 ,5000    ,,,"));
        assert!(!HEADER.matches("Type RM Length L Ch R = 1 ,5000    ,100,100,100"));
        assert!(!HEADER.matches("Lateral Weir Type=1 "));
    }

    #[test]
    fn test_similar_labels_do_not_overlap() {
        for line in ["Lateral Weir SE=3 ", "Lateral Weir SS=0,0", "Lateral Weir Type=0 "] {
            let claims = LATERAL_WEIR_FIELDS.iter().filter(|s| s.matches(line)).count();
            assert_eq!(claims, 1, "{}", line);
        }
    }
}
