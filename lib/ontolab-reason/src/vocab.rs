//! Vocabulary terms used by the rule set that are not provided by [`oxrdf::vocab`].

pub mod owl {
    //! [OWL 2](https://www.w3.org/TR/owl2-syntax/) vocabulary.
    use oxrdf::NamedNodeRef;

    /// The OWL namespace: `http://www.w3.org/2002/07/owl#`
    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";

    pub const ALL_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const DISJOINT_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentProperty");
    pub const HAS_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasValue");
    pub const INTERSECTION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#intersectionOf");
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    /// [The empty class](https://www.w3.org/TR/owl2-syntax/#Class_Expressions)
    pub const NOTHING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing");
    pub const ON_DATATYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onDatatype");
    pub const ON_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    pub const RESTRICTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
    pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    /// [The class containing every individual](https://www.w3.org/TR/owl2-syntax/#Class_Expressions)
    pub const THING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    pub const UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
    pub const WITH_RESTRICTIONS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#withRestrictions");
}

pub mod facet {
    //! [XML Schema constraining facets](https://www.w3.org/TR/xmlschema11-2/#rf-facets) usable in OWL datatype restrictions.
    use oxrdf::NamedNodeRef;

    pub const MAX_EXCLUSIVE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#maxExclusive");
    pub const MAX_INCLUSIVE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#maxInclusive");
    pub const MIN_EXCLUSIVE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#minExclusive");
    pub const MIN_INCLUSIVE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#minInclusive");
}
