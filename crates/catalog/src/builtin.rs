//! The four Jinan springs shipped with the guide.

use shared::domain::{Hotspot, HotspotId, Position, SpringId, SpringRecord};

fn hotspot(id: &str, name: &str, x: f32, y: f32, info: &str) -> Hotspot {
    Hotspot {
        id: HotspotId::new(id),
        name: name.to_string(),
        position: Position::new(x, y),
        info: info.to_string(),
    }
}

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn records() -> Vec<SpringRecord> {
    vec![
        SpringRecord {
            id: SpringId::new("baotu"),
            name: "趵突泉".to_string(),
            location: "济南市历下区趵突泉南路1号".to_string(),
            description: "济南三大名胜之一，被誉为\"天下第一泉\"，泉水一年四季恒定在18℃左右".to_string(),
            history: "趵突泉有着悠久的历史，早在《春秋》时代就有记载。北魏郦道元《水经注》称其为\"泺水\"，宋代文学家曾巩始称\"趵突泉\"。".to_string(),
            legend: "相传很久以前，济南大旱三年，民不聊生。东海龙王派遣三个儿子前来济南救民于水火，化身为三股清泉，日夜不停地向上喷涌。".to_string(),
            temperature: "18°C".to_string(),
            depth: "4.5米".to_string(),
            flow: "240立方米/小时".to_string(),
            features: features(&["三股并发", "声如隐雷", "势如鼎沸", "冬暖夏凉"]),
            image: "https://static.yueya.net/shuomingshu.cn//wp-content/uploads/images/2022/11/25/daeace802891460c8c08c5f74570d727_mugypk0a1st.jpg".to_string(),
            ar_model: "/models/baotu-spring.glb".to_string(),
            audio_guide: "/audio/baotu-guide.mp3".to_string(),
            coordinates: Position::new(50.0, 60.0),
            hotspots: vec![
                hotspot("main-spring", "主泉眼", 45.0, 55.0, "三股泉水并发，声如隐雷，势如鼎沸，是趵突泉的核心景观"),
                hotspot("pavilion", "观澜亭", 60.0, 40.0, "明代建筑，是观赏趵突泉的最佳位置，亭内有历代文人墨客的题词"),
                hotspot("stone-tablet", "趵突泉石碑", 35.0, 70.0, "清代康熙皇帝御笔亲题\"激湍\"二字，彰显了趵突泉的皇家地位"),
            ],
        },
        SpringRecord {
            id: SpringId::new("heihu"),
            name: "黑虎泉".to_string(),
            location: "济南市历下区黑虎泉西路".to_string(),
            description: "济南四大泉群之一，因泉水从虎头石雕中喷出而得名，水声如虎啸".to_string(),
            history: "黑虎泉的历史可追溯到金代，明代晏璧《七十二泉诗》和清代郝植恭《七十二泉记》都有详细记载。".to_string(),
            legend: "传说古时有一只神虎守护着这眼泉水，每当有人想要污染泉水时，黑虎就会现身阻止，泉水从虎头中喷出，声如虎啸。".to_string(),
            temperature: "17°C".to_string(),
            depth: "3.8米".to_string(),
            flow: "180立方米/小时".to_string(),
            features: features(&["虎头出水", "声如虎啸", "水质甘甜", "四季不竭"]),
            image: "https://youimg1.c-ctrip.com/target/100o0z000000n5xzw010C.jpg".to_string(),
            ar_model: "/models/heihu-spring.glb".to_string(),
            audio_guide: "/audio/heihu-guide.mp3".to_string(),
            coordinates: Position::new(30.0, 45.0),
            hotspots: vec![
                hotspot("tiger-heads", "三个虎头", 25.0, 40.0, "三个石雕虎头并排而立，泉水从虎口中喷涌而出，造型威武雄壮"),
                hotspot("spring-pool", "泉池", 35.0, 50.0, "长约30米的天然石砌泉池，池水清澈见底，常年保持恒温"),
                hotspot("ancient-wall", "古城墙", 20.0, 35.0, "明代济南古城墙遗址，见证了黑虎泉的历史变迁"),
            ],
        },
        SpringRecord {
            id: SpringId::new("wulongtan"),
            name: "五龙潭".to_string(),
            location: "济南市历下区趵突泉北路42号".to_string(),
            description: "由五处泉水组成，相传为五龙所居，是济南市区最大的古典园林式公园".to_string(),
            history: "五龙潭历史悠久，相传为隋唐英雄秦琼府邸，明清时期成为著名的游览胜地。".to_string(),
            legend: "相传古时济南水患频发，玉皇大帝派遣五条神龙前来治水，五龙合力制服水患，留下五个相连的泉池。".to_string(),
            temperature: "16°C".to_string(),
            depth: "5.2米".to_string(),
            flow: "150立方米/小时".to_string(),
            features: features(&["五泉相连", "古木参天", "亭台楼阁", "文化底蕴深厚"]),
            image: "https://img1.qunarzz.com/travel/d5/1703/5b/4590a549977c07b5.jpg_r_640x426x70_16dec1a9.jpg".to_string(),
            ar_model: "/models/wulongtan-spring.glb".to_string(),
            audio_guide: "/audio/wulongtan-guide.mp3".to_string(),
            coordinates: Position::new(70.0, 30.0),
            hotspots: vec![
                hotspot("main-pool", "主池", 65.0, 25.0, "五龙潭的主要泉池，面积最大，水深超过5米，是五龙潭的核心"),
                hotspot("ancient-temple", "古温泉", 75.0, 35.0, "历史悠久的温泉遗址，相传为秦琼当年的沐浴之所"),
                hotspot("dragon-pavilion", "五龙亭", 70.0, 20.0, "纪念五龙治水的古亭，亭内有五龙雕像，工艺精美"),
            ],
        },
        SpringRecord {
            id: SpringId::new("zhenzhu"),
            name: "珍珠泉".to_string(),
            location: "济南市历下区泉城路珍珠泉宾馆院内".to_string(),
            description: "泉水从池底冒出，形如珍珠串串上升，晶莹剔透，故名珍珠泉".to_string(),
            history: "珍珠泉在明清时期就已闻名，清代文人多有吟咏，是济南著名的观泉胜地。".to_string(),
            legend: "传说古时有仙女思念人间恋人，每日以泪洗面，眼泪滴落人间化作清泉，泉中气泡就是仙女思念的眼泪化成的珍珠。".to_string(),
            temperature: "19°C".to_string(),
            depth: "2.8米".to_string(),
            flow: "120立方米/小时".to_string(),
            features: features(&["珠泡串串", "晶莹剔透", "水质纯净", "四季如春"]),
            image: "https://youimg1.c-ctrip.com/target/10061f000001gquixD810_D_10000_1200.jpg?proc=autoorient".to_string(),
            ar_model: "/models/zhenzhu-spring.glb".to_string(),
            audio_guide: "/audio/zhenzhu-guide.mp3".to_string(),
            coordinates: Position::new(40.0, 80.0),
            hotspots: vec![
                hotspot("pearl-bubbles", "珍珠气泡", 35.0, 75.0, "从池底不断冒出的气泡，如珍珠般晶莹剔透，是珍珠泉的独特景观"),
                hotspot("ancient-courtyard", "古院落", 45.0, 85.0, "明清时期的古建筑群，展现了济南传统建筑的精美工艺"),
                hotspot("wishing-well", "许愿池", 40.0, 70.0, "游客常在此许愿祈福，相传在珍珠泉许愿会带来好运"),
            ],
        },
    ]
}
