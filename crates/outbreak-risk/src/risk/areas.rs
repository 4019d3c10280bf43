//! States and districts seeded into the region parameter book.

use super::parameters::AreaSeed;

/// Each state with the districts planners tune individually.
pub const STATE_DISTRICTS: &[(&str, &[&str])] = &[
    (
        "Andhra Pradesh",
        &[
            "Visakhapatnam", "Vijayawada", "Tirupati", "Guntur", "Nellore", "Kurnool",
            "Kakinada", "Anantapur", "Kadapa", "Eluru", "Ongole",
        ],
    ),
    (
        "Arunachal Pradesh",
        &[
            "Itanagar", "Naharlagun", "Pasighat", "Tawang", "Bomdila", "Ziro", "Tezu", "Roing",
            "Yingkiong", "Aalo",
        ],
    ),
    (
        "Assam",
        &[
            "Guwahati", "Silchar", "Dibrugarh", "Jorhat", "Tezpur", "Nagaon", "Bongaigaon",
            "Tinsukia", "Goalpara", "Karimganj", "Dhubri",
        ],
    ),
    (
        "Bihar",
        &[
            "Patna", "Gaya", "Muzaffarpur", "Bhagalpur", "Darbhanga", "Arrah", "Begusarai",
            "Chhapra", "Katihar", "Purnia", "Samastipur",
        ],
    ),
    (
        "Chhattisgarh",
        &[
            "Raipur", "Bilaspur", "Bhilai", "Korba", "Durg", "Rajnandgaon", "Raigarh",
            "Jagdalpur", "Ambikapur", "Dhamtari",
        ],
    ),
    (
        "Goa",
        &[
            "Panaji", "Margao", "Vasco da Gama", "Mapusa", "Ponda", "Curchorem", "Canacona",
            "Bicholim", "Pernem", "Quepem",
        ],
    ),
    (
        "Gujarat",
        &[
            "Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar", "Jamnagar", "Gandhinagar",
            "Junagadh", "Anand", "Bharuch", "Patan",
        ],
    ),
    (
        "Haryana",
        &[
            "Faridabad", "Gurgaon", "Panipat", "Ambala", "Hisar", "Karnal", "Rohtak", "Sonipat",
            "Yamunanagar", "Panchkula",
        ],
    ),
    (
        "Himachal Pradesh",
        &[
            "Shimla", "Mandi", "Dharamshala", "Solan", "Kullu", "Hamirpur", "Nahan", "Chamba",
            "Bilaspur", "Una",
        ],
    ),
    (
        "Jharkhand",
        &[
            "Ranchi", "Jamshedpur", "Dhanbad", "Bokaro", "Hazaribagh", "Deoghar", "Giridih",
            "Ramgarh", "Phusro", "Medininagar",
        ],
    ),
    (
        "Karnataka",
        &[
            "Bengaluru", "Mysuru", "Mangaluru", "Belagavi", "Kalaburagi", "Hubballi",
            "Shivamogga", "Tumakuru", "Davanagere", "Ballari", "Vijayapura",
        ],
    ),
    (
        "Kerala",
        &[
            "Kozhikode", "Malappuram", "Kannur", "Wayanad", "Thrissur", "Palakkad", "Ernakulam",
            "Idukki", "Thiruvananthapuram", "Kollam", "Kottayam",
        ],
    ),
    (
        "Madhya Pradesh",
        &[
            "Bhopal", "Indore", "Jabalpur", "Gwalior", "Ujjain", "Sagar", "Dewas", "Satna",
            "Rewa", "Ratlam", "Singrauli",
        ],
    ),
    (
        "Maharashtra",
        &[
            "Mumbai", "Pune", "Nagpur", "Thane", "Nashik", "Aurangabad", "Solapur", "Kolhapur",
            "Amravati", "Nanded", "Sangli",
        ],
    ),
    (
        "Manipur",
        &[
            "Imphal", "Thoubal", "Bishnupur", "Senapati", "Ukhrul", "Chandel", "Churachandpur",
            "Tamenglong", "Jiribam", "Kangpokpi",
        ],
    ),
    (
        "Meghalaya",
        &[
            "Shillong", "Tura", "Jowai", "Nongstoin", "Williamnagar", "Baghmara", "Resubelpara",
            "Khliehriat", "Mawkyrwat", "Ampati",
        ],
    ),
    (
        "Mizoram",
        &[
            "Aizawl", "Lunglei", "Champhai", "Kolasib", "Serchhip", "Siaha", "Lawngtlai",
            "Mamit", "Khawzawl", "Saitual",
        ],
    ),
    (
        "Nagaland",
        &[
            "Kohima", "Dimapur", "Mokokchung", "Tuensang", "Wokha", "Zunheboto", "Phek", "Mon",
            "Peren", "Kiphire",
        ],
    ),
    (
        "Odisha",
        &[
            "Bhubaneswar", "Cuttack", "Rourkela", "Brahmapur", "Sambalpur", "Puri", "Balasore",
            "Bhadrak", "Baripada", "Jeypore", "Jharsuguda",
        ],
    ),
    (
        "Punjab",
        &[
            "Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda", "Hoshiarpur", "Mohali",
            "Batala", "Pathankot", "Moga",
        ],
    ),
    (
        "Rajasthan",
        &[
            "Jaipur", "Jodhpur", "Udaipur", "Kota", "Bikaner", "Ajmer", "Bharatpur", "Sikar",
            "Alwar", "Bhilwara",
        ],
    ),
    (
        "Sikkim",
        &[
            "Gangtok", "Namchi", "Gyalshing", "Mangan", "Rangpo", "Singtam", "Jorethang",
            "Nayabazar", "Chungthang", "Ravangla",
        ],
    ),
    (
        "Tamil Nadu",
        &[
            "Chennai", "Coimbatore", "Madurai", "Salem", "Tiruchirapalli", "Tirunelveli",
            "Erode", "Tiruppur", "Vellore", "Thanjavur", "Dindigul",
        ],
    ),
    (
        "Telangana",
        &[
            "Hyderabad", "Warangal", "Nizamabad", "Karimnagar", "Khammam", "Ramagundam",
            "Mahbubnagar", "Nalgonda", "Adilabad", "Suryapet", "Siddipet",
        ],
    ),
    (
        "Tripura",
        &[
            "Agartala", "Udaipur", "Dharmanagar", "Kailashahar", "Belonia", "Khowai", "Ambassa",
            "Sonamura", "Sabroom", "Santirbazar",
        ],
    ),
    (
        "Uttar Pradesh",
        &[
            "Lucknow", "Kanpur", "Ghaziabad", "Agra", "Varanasi", "Meerut", "Prayagraj",
            "Aligarh", "Bareilly", "Moradabad", "Saharanpur",
        ],
    ),
    (
        "Uttarakhand",
        &[
            "Dehradun", "Haridwar", "Roorkee", "Haldwani", "Rudrapur", "Kashipur", "Rishikesh",
            "Pithoragarh", "Ramnagar", "Khatima",
        ],
    ),
    (
        "West Bengal",
        &[
            "Kolkata", "Siliguri", "Howrah", "Darjeeling", "Jalpaiguri", "Cooch Behar",
            "Alipurduar", "Durgapur", "Asansol", "Kharagpur", "Malda",
        ],
    ),
];

pub fn districts_of(state: &str) -> Option<&'static [&'static str]> {
    STATE_DISTRICTS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, districts)| *districts)
}

/// Every state and district in [`STATE_DISTRICTS`].
pub fn standard_areas() -> Vec<AreaSeed> {
    STATE_DISTRICTS
        .iter()
        .map(|(state, districts)| AreaSeed::with_districts(state, districts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_state_once() {
        assert_eq!(STATE_DISTRICTS.len(), 28);
        let mut states: Vec<&str> = STATE_DISTRICTS.iter().map(|(state, _)| *state).collect();
        states.sort_unstable();
        states.dedup();
        assert_eq!(states.len(), 28);
        assert!(STATE_DISTRICTS
            .iter()
            .all(|(_, districts)| districts.len() >= 10));
    }

    #[test]
    fn looks_up_districts_by_state() {
        let assam = districts_of("Assam").expect("assam listed");
        assert_eq!(assam.first(), Some(&"Guwahati"));
        assert!(districts_of("Kerala").is_some_and(|kerala| kerala.contains(&"Kozhikode")));
        assert!(districts_of("Atlantis").is_none());
    }
}
