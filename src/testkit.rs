//! Hand-written stand-ins for generated models, shared by the test modules.

use std::collections::HashMap;
use std::ops::{BitAnd, BitOr};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::composed::{ResolutionState, discriminator_value, merge_first_wins, project_deserializers};
use crate::enums::{WireEnum, WireEnumMember, WireFlags};
use crate::error::Error;
use crate::model::{AdditionalData, FieldDeserializerMap, Parsable};
use crate::node::JsonParseNode;
use crate::untyped::UntypedNode;
use crate::writer::JsonSerializationWriter;

// -------------------------------- Enums ----------------------------------- //

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestFlags(pub u32);

impl BitOr for TestFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        TestFlags(self.0 | rhs.0)
    }
}

impl BitAnd for TestFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        TestFlags(self.0 & rhs.0)
    }
}

impl WireFlags for TestFlags {
    fn members() -> &'static [WireEnumMember<Self>] {
        &[
            WireEnumMember { value: TestFlags(1), name: "One", wire_name: None },
            WireEnumMember { value: TestFlags(2), name: "Two", wire_name: None },
            WireEnumMember { value: TestFlags(4), name: "Three", wire_name: None },
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingEnum {
    Item1,
    Item2SubItem1,
}

impl WireEnum for NamingEnum {
    fn members() -> &'static [WireEnumMember<Self>] {
        &[
            WireEnumMember { value: NamingEnum::Item1, name: "Item1", wire_name: None },
            WireEnumMember {
                value: NamingEnum::Item2SubItem1,
                name: "Item2SubItem1",
                wire_name: Some("Item2:SubItem1"),
            },
        ]
    }
}

// ------------------------------- Entities --------------------------------- //

#[derive(Debug, Default, PartialEq)]
pub struct TestEntity {
    pub id: Option<String>,
    pub office_location: Option<String>,
    pub numbers: Option<TestFlags>,
    pub naming_enum: Option<NamingEnum>,
    pub work_duration: Option<Duration>,
    pub birth_day: Option<NaiveDate>,
    pub height_in_metres: Option<Decimal>,
    pub start_work_time: Option<NaiveTime>,
    pub end_work_time: Option<NaiveTime>,
    pub created_date_time: Option<DateTime<FixedOffset>>,
    pub business_phones: Option<Vec<String>>,
    pub additional_data: AdditionalData,
}

impl TestEntity {
    pub fn create_from_discriminator(_node: &JsonParseNode<'_>) -> Result<Self, Error> {
        Ok(TestEntity::default())
    }
}

impl Parsable for TestEntity {
    fn field_deserializers(&self) -> FieldDeserializerMap<Self> {
        let mut map: FieldDeserializerMap<Self> = HashMap::new();
        map.insert("id", Box::new(|m: &mut Self, n| {
            m.id = n.get_string_value();
            Ok(())
        }));
        map.insert("officeLocation", Box::new(|m: &mut Self, n| {
            m.office_location = n.get_string_value();
            Ok(())
        }));
        map.insert("numbers", Box::new(|m: &mut Self, n| {
            m.numbers = n.get_flags_enum_value();
            Ok(())
        }));
        map.insert("testNamingEnum", Box::new(|m: &mut Self, n| {
            m.naming_enum = n.get_enum_value();
            Ok(())
        }));
        map.insert("workDuration", Box::new(|m: &mut Self, n| {
            m.work_duration = n.get_duration_value()?;
            Ok(())
        }));
        map.insert("birthDay", Box::new(|m: &mut Self, n| {
            m.birth_day = n.get_date_value()?;
            Ok(())
        }));
        map.insert("heightInMetres", Box::new(|m: &mut Self, n| {
            m.height_in_metres = n.get_decimal_value()?;
            Ok(())
        }));
        map.insert("startWorkTime", Box::new(|m: &mut Self, n| {
            m.start_work_time = n.get_time_value()?;
            Ok(())
        }));
        map.insert("endWorkTime", Box::new(|m: &mut Self, n| {
            m.end_work_time = n.get_time_value()?;
            Ok(())
        }));
        map.insert("createdDateTime", Box::new(|m: &mut Self, n| {
            m.created_date_time = n.get_date_time_offset_value()?;
            Ok(())
        }));
        map.insert("businessPhones", Box::new(|m: &mut Self, n| {
            let phones = n
                .get_collection_of_primitive_values::<String>()
                .collect::<Result<Vec<Option<String>>, Error>>()?;
            m.business_phones = Some(phones.into_iter().flatten().collect());
            Ok(())
        }));
        map
    }

    fn serialize(&self, writer: &mut JsonSerializationWriter) {
        if let Some(v) = &self.id {
            writer.write_string_value(Some("id"), v);
        }
        if let Some(v) = self.numbers {
            writer.write_flags_enum_value(Some("numbers"), v);
        }
        if let Some(v) = self.naming_enum {
            writer.write_enum_value(Some("testNamingEnum"), v);
        }
        if let Some(v) = self.work_duration {
            writer.write_duration_value(Some("workDuration"), v);
        }
        if let Some(v) = self.birth_day {
            writer.write_date_value(Some("birthDay"), v);
        }
        if let Some(v) = self.height_in_metres {
            writer.write_decimal_value(Some("heightInMetres"), v);
        }
        if let Some(v) = self.start_work_time {
            writer.write_time_value(Some("startWorkTime"), v);
        }
        if let Some(v) = self.end_work_time {
            writer.write_time_value(Some("endWorkTime"), v);
        }
        if let Some(v) = self.created_date_time {
            writer.write_date_time_offset_value(Some("createdDateTime"), v);
        }
        if let Some(v) = &self.office_location {
            writer.write_string_value(Some("officeLocation"), v);
        }
        if let Some(v) = &self.business_phones {
            writer.write_collection_of_primitive_values(Some("businessPhones"), v);
        }
        writer.write_additional_data(&self.additional_data);
    }

    fn additional_data_sink(&mut self) -> Option<&mut AdditionalData> {
        Some(&mut self.additional_data)
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct SecondTestEntity {
    pub id: Option<i64>,
    pub display_name: Option<String>,
}

impl SecondTestEntity {
    pub fn create_from_discriminator(_node: &JsonParseNode<'_>) -> Result<Self, Error> {
        Ok(SecondTestEntity::default())
    }
}

impl Parsable for SecondTestEntity {
    fn field_deserializers(&self) -> FieldDeserializerMap<Self> {
        let mut map: FieldDeserializerMap<Self> = HashMap::new();
        map.insert("id", Box::new(|m: &mut Self, n| {
            m.id = n.get_i64_value()?;
            Ok(())
        }));
        map.insert("displayName", Box::new(|m: &mut Self, n| {
            m.display_name = n.get_string_value();
            Ok(())
        }));
        map
    }

    fn serialize(&self, writer: &mut JsonSerializationWriter) {
        if let Some(v) = self.id {
            writer.write_i64_value(Some("id"), v);
        }
        if let Some(v) = &self.display_name {
            writer.write_string_value(Some("displayName"), v);
        }
    }
}

// --------------------------- Composed wrappers ---------------------------- //

fn union_first(w: &mut UnionWrapper) -> Option<&mut TestEntity> {
    w.first.as_mut()
}

fn union_second(w: &mut UnionWrapper) -> Option<&mut SecondTestEntity> {
    w.second.as_mut()
}

/// "One of": discriminator-driven; exactly one candidate is instantiated.
#[derive(Debug, Default)]
pub struct UnionWrapper {
    pub first: Option<TestEntity>,
    pub second: Option<SecondTestEntity>,
    pub scalar: Option<String>,
    pub state: ResolutionState,
    pub chosen: Option<String>,
}

impl UnionWrapper {
    pub fn create_from_discriminator(node: &JsonParseNode<'_>) -> Result<Self, Error> {
        let mut wrapper = UnionWrapper::default();
        if let Some(text) = node.get_string_value() {
            wrapper.scalar = Some(text);
            wrapper.state = ResolutionState::ScalarResolved;
            return Ok(wrapper);
        }
        match discriminator_value(node, "@type")?.as_deref() {
            Some("A") => {
                wrapper.first = Some(TestEntity::default());
                wrapper.chosen = Some("A".into());
                wrapper.state = ResolutionState::CandidatesResolved;
            }
            Some("B") => {
                wrapper.second = Some(SecondTestEntity::default());
                wrapper.chosen = Some("B".into());
                wrapper.state = ResolutionState::CandidatesResolved;
            }
            _ => {}
        }
        Ok(wrapper)
    }
}

impl Parsable for UnionWrapper {
    fn field_deserializers(&self) -> FieldDeserializerMap<Self> {
        if self.state != ResolutionState::CandidatesResolved {
            return FieldDeserializerMap::new();
        }
        if let Some(first) = &self.first {
            return project_deserializers(first.field_deserializers(), union_first);
        }
        if let Some(second) = &self.second {
            return project_deserializers(second.field_deserializers(), union_second);
        }
        FieldDeserializerMap::new()
    }

    fn serialize(&self, writer: &mut JsonSerializationWriter) {
        if let Some(scalar) = &self.scalar {
            writer.write_string_value(None, scalar);
        } else if let Some(first) = &self.first {
            writer.write_object_value(None, first);
        } else if let Some(second) = &self.second {
            writer.write_object_value(None, second);
        }
    }

    fn is_composed(&self) -> bool {
        true
    }
}

fn intersection_first(w: &mut IntersectionWrapper) -> Option<&mut TestEntity> {
    w.first.as_mut()
}

fn intersection_second(w: &mut IntersectionWrapper) -> Option<&mut SecondTestEntity> {
    w.second.as_mut()
}

/// "All of": brute-force; every candidate is instantiated and the field
/// tables merge with first-registered-wins collisions.
#[derive(Debug, Default)]
pub struct IntersectionWrapper {
    pub first: Option<TestEntity>,
    pub second: Option<SecondTestEntity>,
    pub scalar: Option<String>,
    pub state: ResolutionState,
}

impl IntersectionWrapper {
    pub fn create_from_discriminator(node: &JsonParseNode<'_>) -> Result<Self, Error> {
        let mut wrapper = IntersectionWrapper {
            first: Some(TestEntity::default()),
            second: Some(SecondTestEntity::default()),
            ..IntersectionWrapper::default()
        };
        if let Some(text) = node.get_string_value() {
            wrapper.scalar = Some(text);
            wrapper.state = ResolutionState::ScalarResolved;
        } else {
            wrapper.state = ResolutionState::CandidatesResolved;
        }
        Ok(wrapper)
    }
}

impl Parsable for IntersectionWrapper {
    fn field_deserializers(&self) -> FieldDeserializerMap<Self> {
        if self.state != ResolutionState::CandidatesResolved {
            return FieldDeserializerMap::new();
        }
        let mut tables = Vec::new();
        if let Some(first) = &self.first {
            tables.push(project_deserializers(
                first.field_deserializers(),
                intersection_first,
            ));
        }
        if let Some(second) = &self.second {
            tables.push(project_deserializers(
                second.field_deserializers(),
                intersection_second,
            ));
        }
        merge_first_wins(tables)
    }

    fn serialize(&self, writer: &mut JsonSerializationWriter) {
        if let Some(scalar) = &self.scalar {
            writer.write_string_value(None, scalar);
        } else {
            let mut parts: Vec<&dyn Parsable> = Vec::new();
            if let Some(first) = &self.first {
                parts.push(first);
            }
            if let Some(second) = &self.second {
                parts.push(second);
            }
            writer.write_fused_object_value(None, &parts);
        }
    }

    fn is_composed(&self) -> bool {
        true
    }
}

// ---------------------------- Untyped entity ------------------------------ //

/// A model whose free-form fields materialize as tagged value trees.
#[derive(Debug, Default)]
pub struct UntypedTestEntity {
    pub id: Option<String>,
    pub title: Option<String>,
    pub location: Option<UntypedNode>,
    pub keywords: Option<UntypedNode>,
    pub detail: Option<UntypedNode>,
    pub additional_data: AdditionalData,
}

impl UntypedTestEntity {
    pub fn create_from_discriminator(_node: &JsonParseNode<'_>) -> Result<Self, Error> {
        Ok(UntypedTestEntity::default())
    }
}

impl Parsable for UntypedTestEntity {
    fn field_deserializers(&self) -> FieldDeserializerMap<Self> {
        let mut map: FieldDeserializerMap<Self> = HashMap::new();
        map.insert("id", Box::new(|m: &mut Self, n| {
            m.id = n.get_string_value();
            Ok(())
        }));
        map.insert("title", Box::new(|m: &mut Self, n| {
            m.title = n.get_string_value();
            Ok(())
        }));
        map.insert("location", Box::new(|m: &mut Self, n| {
            m.location = Some(n.get_object_value(UntypedNode::from_node)?);
            Ok(())
        }));
        map.insert("keywords", Box::new(|m: &mut Self, n| {
            m.keywords = Some(n.get_object_value(UntypedNode::from_node)?);
            Ok(())
        }));
        map.insert("detail", Box::new(|m: &mut Self, n| {
            m.detail = Some(n.get_object_value(UntypedNode::from_node)?);
            Ok(())
        }));
        map
    }

    fn serialize(&self, writer: &mut JsonSerializationWriter) {
        if let Some(v) = &self.id {
            writer.write_string_value(Some("id"), v);
        }
        if let Some(v) = &self.title {
            writer.write_string_value(Some("title"), v);
        }
        if let Some(v) = &self.location {
            writer.write_object_value(Some("location"), v);
        }
        if let Some(v) = &self.keywords {
            writer.write_object_value(Some("keywords"), v);
        }
        if let Some(v) = &self.detail {
            writer.write_object_value(Some("detail"), v);
        }
        writer.write_additional_data(&self.additional_data);
    }

    fn additional_data_sink(&mut self) -> Option<&mut AdditionalData> {
        Some(&mut self.additional_data)
    }
}
